//! Kodierungs-Hilfen: Hex, Base64, PEM
//!
//! Reine Funktionen ohne IO. Jede Kodierung hat ihre Umkehrung, Fehler
//! werden immer als `CryptoError::UngueltigeKodierung` gemeldet.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{CryptoError, CryptoResult};

/// Bytes -> Hex (Kleinbuchstaben)
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Hex -> Bytes
///
/// Akzeptiert Gross- und Kleinbuchstaben. Ungerade Laenge oder
/// Nicht-Hex-Zeichen ergeben `UngueltigeKodierung`.
pub fn hex_to_bytes(hex_str: &str) -> CryptoResult<Vec<u8>> {
    if hex_str.len() % 2 != 0 {
        return Err(CryptoError::UngueltigeKodierung(format!(
            "Hex-String mit ungerader Laenge ({})",
            hex_str.len()
        )));
    }
    Ok(hex::decode(hex_str)?)
}

/// Bytes -> Base64 (RFC 4648, mit Padding)
pub fn bytes_to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Base64 (RFC 4648, mit Padding) -> Bytes
pub fn base64_to_bytes(b64: &str) -> CryptoResult<Vec<u8>> {
    Ok(STANDARD.decode(b64.trim())?)
}

/// Zerlegtes PEM-Dokument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PemBlock {
    /// Label aus der Kopfzeile, z.B. `PUBLIC KEY` oder `RSA PRIVATE KEY`
    pub label: String,
    /// DER-kodierter Inhalt
    pub der: Vec<u8>,
}

/// PEM -> DER
///
/// Entfernt Kopf-/Fusszeile und Zeilenumbrueche und dekodiert den Rest.
pub fn pem_to_der(pem: &str) -> CryptoResult<Vec<u8>> {
    Ok(parse_pem(pem)?.der)
}

/// Zerlegt ein PEM-Dokument in Label und DER-Inhalt
pub fn parse_pem(pem: &str) -> CryptoResult<PemBlock> {
    let mut zeilen = pem.lines().map(str::trim).filter(|z| !z.is_empty());

    let kopf = zeilen
        .next()
        .ok_or_else(|| CryptoError::UngueltigeKodierung("PEM ist leer".into()))?;
    let label = kopf
        .strip_prefix("-----BEGIN ")
        .and_then(|rest| rest.strip_suffix("-----"))
        .ok_or_else(|| CryptoError::UngueltigeKodierung("PEM-Kopfzeile fehlt".into()))?
        .to_string();

    let mut body = String::new();
    let mut fuss_gefunden = false;
    for zeile in zeilen {
        if let Some(rest) = zeile.strip_prefix("-----END ") {
            if rest.strip_suffix("-----") != Some(label.as_str()) {
                return Err(CryptoError::UngueltigeKodierung(format!(
                    "PEM-Fusszeile passt nicht zu '{label}'"
                )));
            }
            fuss_gefunden = true;
            break;
        }
        body.push_str(zeile);
    }

    if !fuss_gefunden {
        return Err(CryptoError::UngueltigeKodierung("PEM-Fusszeile fehlt".into()));
    }
    if body.is_empty() {
        return Err(CryptoError::UngueltigeKodierung("PEM ohne Inhalt".into()));
    }

    let der = base64_to_bytes(&body)?;
    Ok(PemBlock { label, der })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PEM: &str = "-----BEGIN PUBLIC KEY-----\nAAEC\nAwQF\n-----END PUBLIC KEY-----\n";

    #[test]
    fn hex_roundtrip() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let hex_str = bytes_to_hex(&bytes);
        assert_eq!(hex_str.len(), 512);
        assert_eq!(hex_to_bytes(&hex_str).unwrap(), bytes);
    }

    #[test]
    fn hex_grossbuchstaben_erlaubt() {
        let bytes = hex_to_bytes("770A8A65DA156D24EE2A093277530142").unwrap();
        assert_eq!(bytes.len(), 16);
        assert_eq!(bytes[0], 0x77);
        assert_eq!(bytes[1], 0x0a);
    }

    #[test]
    fn hex_ungerade_laenge_schlaegt_fehl() {
        let result = hex_to_bytes("abc");
        assert!(matches!(result, Err(CryptoError::UngueltigeKodierung(_))));
    }

    #[test]
    fn hex_ungueltiges_zeichen_schlaegt_fehl() {
        let result = hex_to_bytes("zz");
        assert!(matches!(result, Err(CryptoError::UngueltigeKodierung(_))));
    }

    #[test]
    fn hex_leer_ist_leer() {
        assert!(hex_to_bytes("").unwrap().is_empty());
        assert_eq!(bytes_to_hex(&[]), "");
    }

    #[test]
    fn base64_mit_padding() {
        assert_eq!(bytes_to_base64(b"ab"), "YWI=");
        assert_eq!(base64_to_bytes("YWI=").unwrap(), b"ab");
    }

    #[test]
    fn base64_ungueltig_schlaegt_fehl() {
        let result = base64_to_bytes("###");
        assert!(matches!(result, Err(CryptoError::UngueltigeKodierung(_))));
    }

    #[test]
    fn pem_zu_der() {
        let der = pem_to_der(TEST_PEM).unwrap();
        assert_eq!(der, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn pem_label_wird_gelesen() {
        let block = parse_pem(TEST_PEM).unwrap();
        assert_eq!(block.label, "PUBLIC KEY");
    }

    #[test]
    fn pem_mit_crlf() {
        let pem = TEST_PEM.replace('\n', "\r\n");
        assert_eq!(pem_to_der(&pem).unwrap(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn pem_ohne_kopfzeile_schlaegt_fehl() {
        let result = pem_to_der("AAEC\n-----END PUBLIC KEY-----");
        assert!(matches!(result, Err(CryptoError::UngueltigeKodierung(_))));
    }

    #[test]
    fn pem_ohne_fusszeile_schlaegt_fehl() {
        let result = pem_to_der("-----BEGIN PUBLIC KEY-----\nAAEC\n");
        assert!(matches!(result, Err(CryptoError::UngueltigeKodierung(_))));
    }

    #[test]
    fn pem_mit_falschem_fusslabel_schlaegt_fehl() {
        let result =
            pem_to_der("-----BEGIN PUBLIC KEY-----\nAAEC\n-----END PRIVATE KEY-----\n");
        assert!(matches!(result, Err(CryptoError::UngueltigeKodierung(_))));
    }

    #[test]
    fn pem_mit_kaputtem_base64_schlaegt_fehl() {
        let result = pem_to_der("-----BEGIN PUBLIC KEY-----\n!!!!\n-----END PUBLIC KEY-----\n");
        assert!(matches!(result, Err(CryptoError::UngueltigeKodierung(_))));
    }
}
