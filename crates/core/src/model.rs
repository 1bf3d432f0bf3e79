//! Datenmodelle wie sie ueber die Backend-Schnittstelle fliessen
//!
//! Feldnamen folgen dem JSON des Backends (camelCase). Nachrichteninhalte
//! und Gruppenschluessel sind hier immer verschluesselt (Base64).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{GroupId, UserId};

/// Gruppenschluessel, verschluesselt fuer genau ein Mitglied
///
/// `encrypted_group_key` ist Base64(RSA-OAEP(Base64(hex-Gruppenschluessel))).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedGroupKey {
    pub group_id: GroupId,
    pub recipient_user_id: UserId,
    pub encrypted_group_key: String,
}

/// Verschluesselte Chat-Nachricht aus dem Nachrichtenspeicher des Backends
///
/// `content` ist Base64(nonce(12) ‖ ciphertext ‖ tag(16)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedMessage {
    #[serde(default, alias = "group")]
    pub group_id: Option<GroupId>,
    /// Das Backend liefert den Absender als `sender`
    #[serde(alias = "sender")]
    pub sender_id: UserId,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Body fuer `POST /groups/sendMessage`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub content: String,
    pub sender_id: UserId,
    pub group_id: GroupId,
}

/// Gruppenmitglied wie es `GET /groups/details/{id}` liefert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    #[serde(default, alias = "_id")]
    pub id: Option<UserId>,
    pub username: String,
}

/// Gruppen-Details (Name, Mitglieder, Admin)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDetails {
    pub name: String,
    #[serde(default)]
    pub members: Vec<GroupMember>,
    #[serde(default)]
    pub admin: Option<UserId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nachricht_akzeptiert_sender_feld_des_backends() {
        let json = r#"{
            "sender": "u-1",
            "content": "AAAA",
            "timestamp": "2024-05-01T12:00:00Z"
        }"#;
        let msg: EncryptedMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.sender_id, UserId::from("u-1"));
        assert!(msg.group_id.is_none());
        assert!(msg.timestamp.is_some());
    }

    #[test]
    fn neue_nachricht_nutzt_camel_case() {
        let msg = NewMessage {
            content: "Zm9v".into(),
            sender_id: UserId::from("u-1"),
            group_id: GroupId::from("g-1"),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["senderId"], "u-1");
        assert_eq!(json["groupId"], "g-1");
        assert_eq!(json["content"], "Zm9v");
    }

    #[test]
    fn gruppen_details_mit_fehlenden_feldern() {
        let details: GroupDetails =
            serde_json::from_str(r#"{"name": "Team", "members": [{"username": "alice"}]}"#)
                .unwrap();
        assert_eq!(details.name, "Team");
        assert_eq!(details.members.len(), 1);
        assert!(details.admin.is_none());
    }
}
