//! Time-based one-time passcodes (RFC 6238, HMAC-SHA1, 6 digits, 30 s step).

use std::sync::Arc;

use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::domain::{AuthError, PasscodeVerifier};
use hatoba_shared::time::{Clock, SystemClock};

type HmacSha1 = Hmac<Sha1>;

const STEP_SECONDS: i64 = 30;
const DIGITS: usize = 6;
/// Accepted drift, in steps, on either side of the current one.
const SKEW_STEPS: i64 = 1;

pub struct TotpVerifier {
    secret: Vec<u8>,
    clock: Arc<dyn Clock>,
}

impl TotpVerifier {
    /// Build from a base32 secret (RFC 4648 alphabet, padding optional).
    pub fn from_base32(secret: &str) -> Result<Self, AuthError> {
        Self::with_clock(secret, Arc::new(SystemClock))
    }

    pub fn with_clock(secret: &str, clock: Arc<dyn Clock>) -> Result<Self, AuthError> {
        let secret = decode_base32(secret)
            .ok_or_else(|| AuthError::InvalidCredential("invalid base32 secret".to_string()))?;
        if secret.is_empty() {
            return Err(AuthError::InvalidCredential("empty TOTP secret".to_string()));
        }
        Ok(Self { secret, clock })
    }

    /// Passcode for the step containing `unix_seconds`.
    pub fn code_at(&self, unix_seconds: i64) -> String {
        self.code_for_counter((unix_seconds / STEP_SECONDS) as u64)
    }

    fn code_for_counter(&self, counter: u64) -> String {
        let Ok(mut mac) = HmacSha1::new_from_slice(&self.secret) else {
            return String::new();
        };
        mac.update(&counter.to_be_bytes());
        let digest = mac.finalize().into_bytes();

        let offset = (digest[digest.len() - 1] & 0x0f) as usize;
        let binary = ((digest[offset] as u32 & 0x7f) << 24)
            | ((digest[offset + 1] as u32) << 16)
            | ((digest[offset + 2] as u32) << 8)
            | (digest[offset + 3] as u32);

        format!("{:0width$}", binary % 10u32.pow(DIGITS as u32), width = DIGITS)
    }
}

impl PasscodeVerifier for TotpVerifier {
    fn verify(&self, code: &str) -> bool {
        if code.len() != DIGITS || !code.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        let now = self.clock.now_millis() / 1000;
        (-SKEW_STEPS..=SKEW_STEPS).any(|drift| self.code_at(now + drift * STEP_SECONDS) == code)
    }
}

fn decode_base32(input: &str) -> Option<Vec<u8>> {
    let mut output = Vec::with_capacity(input.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits = 0;

    for c in input.chars().filter(|c| !c.is_whitespace() && *c != '=') {
        let value = match c.to_ascii_uppercase() {
            c @ 'A'..='Z' => c as u32 - 'A' as u32,
            c @ '2'..='7' => c as u32 - '2' as u32 + 26,
            _ => return None,
        };
        buffer = (buffer << 5) | value;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            output.push((buffer >> bits) as u8);
            buffer &= (1 << bits) - 1;
        }
    }
    Some(output)
}
