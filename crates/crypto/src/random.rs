//! Zufallsquelle als austauschbare Faehigkeit
//!
//! Alle Nonces, Gruppenschluessel und RSA-Schluesselpaare beziehen ihre
//! Zufallsbytes aus einer `SecureRandomSource`. Produktiv ist das der
//! CSPRNG des Betriebssystems.

use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};

/// Kryptografisch sichere Zufallsquelle
pub trait SecureRandomSource: Send + Sync {
    /// Fuellt `dest` vollstaendig mit Zufallsbytes
    fn fill(&self, dest: &mut [u8]) -> CryptoResult<()>;
}

/// CSPRNG des Betriebssystems
#[derive(Debug, Clone, Copy, Default)]
pub struct OsZufall;

impl SecureRandomSource for OsZufall {
    fn fill(&self, dest: &mut [u8]) -> CryptoResult<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| CryptoError::Zufall(e.to_string()))
    }
}

/// Erzeugt einen CSPRNG fuer `rand`-basierte APIs (z.B. RSA)
///
/// Der 32-Byte-Seed kommt aus der Quelle. Faellt sie aus, liefert die Funktion
/// `CryptoError::Zufall`.
pub(crate) fn csprng_aus_quelle(quelle: &dyn SecureRandomSource) -> CryptoResult<ChaCha20Rng> {
    let seed = Zeroizing::new(zufalls_array::<32>(quelle)?);
    Ok(ChaCha20Rng::from_seed(*seed))
}

/// Erzeugt ein Array fester Laenge aus der Quelle
pub(crate) fn zufalls_array<const N: usize>(quelle: &dyn SecureRandomSource) -> CryptoResult<[u8; N]> {
    let mut buf = [0u8; N];
    quelle.fill(&mut buf)?;
    Ok(buf)
}
