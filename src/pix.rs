//! Static PIX "copia e cola" payload (EMV merchant-presented mode).
//!
//! The checkout screen renders this payload as a QR code when the operator
//! selects PIX. It is display-only: no confirmation handshake happens through
//! it, the operator still confirms the sale manually after the customer pays.

use crate::money;

const PIX_GUI: &str = "br.gov.bcb.pix";
const MERCHANT_NAME_MAX: usize = 25;
const MERCHANT_CITY_MAX: usize = 15;

/// Fixed merchant identity used to build charges. Comes from configuration;
/// the key is a registered PIX key (e-mail, phone or EVP).
#[derive(Debug, Clone)]
pub struct PixCharge {
    pub key: String,
    pub merchant_name: String,
    pub merchant_city: String,
}

impl PixCharge {
    pub fn new(
        key: impl Into<String>,
        merchant_name: impl Into<String>,
        merchant_city: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            merchant_name: merchant_name.into(),
            merchant_city: merchant_city.into(),
        }
    }

    /// Builds the BR Code payload for `amount_cents`.
    ///
    /// Emits the standard tag/length/value sequence: payload format (00),
    /// merchant account info (26: GUI + key), merchant category (52),
    /// currency 986/BRL (53), amount (54), country (58), name (59), city
    /// (60), txid `***` (62-05) and the CRC-16 trailer (63).
    pub fn payload(&self, amount_cents: i64) -> String {
        let amount = format!("{}.{:02}", amount_cents / 100, amount_cents.rem_euclid(100));

        let account = format!(
            "{}{}",
            tlv("00", PIX_GUI),
            tlv("01", &self.key)
        );

        let mut out = String::new();
        out.push_str(&tlv("00", "01"));
        out.push_str(&tlv("26", &account));
        out.push_str(&tlv("52", "0000"));
        out.push_str(&tlv("53", "986"));
        out.push_str(&tlv("54", &amount));
        out.push_str(&tlv("58", "BR"));
        out.push_str(&tlv("59", &truncate(&self.merchant_name, MERCHANT_NAME_MAX)));
        out.push_str(&tlv("60", &truncate(&self.merchant_city, MERCHANT_CITY_MAX)));
        out.push_str(&tlv("62", &tlv("05", "***")));

        // CRC covers everything up to and including the "6304" tag+length.
        out.push_str("6304");
        let crc = crc16_ccitt(out.as_bytes());
        out.push_str(&format!("{:04X}", crc));
        out
    }

    /// Human label shown next to the QR code.
    pub fn display_label(&self, amount_cents: i64) -> String {
        format!("Escaneie para pagar {}", money::format_cents(amount_cents))
    }
}

fn tlv(tag: &str, value: &str) -> String {
    format!("{}{:02}{}", tag, value.len(), value)
}

fn truncate(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// CRC-16/CCITT-FALSE: polynomial 0x1021, initial value 0xFFFF, as mandated
/// by the EMV QR specification for tag 63.
fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn charge() -> PixCharge {
        PixCharge::new("stdr@samuelss.dev", "VENDA", "SAO PAULO")
    }

    #[test]
    fn test_crc16_known_vector() {
        // Standard CRC-16/CCITT-FALSE check value.
        assert_eq!(crc16_ccitt(b"123456789"), 0x29B1);
    }

    #[test]
    fn test_payload_structure() {
        let payload = charge().payload(1234);

        assert!(payload.starts_with("000201"), "payload: {}", payload);
        assert!(payload.contains("br.gov.bcb.pix"));
        assert!(payload.contains("0117stdr@samuelss.dev"));
        assert!(payload.contains("5303986"));
        assert!(payload.contains("5802BR"));
        assert!(payload.contains("5905VENDA"));
        assert!(payload.contains("6009SAO PAULO"));
        assert!(payload.contains("62070503***"));
    }

    #[test]
    fn test_amount_field_length_adjusts() {
        // R$ 12,34 -> "12.34" (5 chars), R$ 1.234,56 -> "1234.56" (7 chars).
        assert!(charge().payload(1234).contains("540512.34"));
        assert!(charge().payload(123_456).contains("54071234.56"));
    }

    #[test]
    fn test_crc_trailer_matches_payload() {
        let payload = charge().payload(5000);
        let (body, crc) = payload.split_at(payload.len() - 4);
        assert!(body.ends_with("6304"));
        assert_eq!(crc, format!("{:04X}", crc16_ccitt(body.as_bytes())));
    }

    #[test]
    fn test_long_merchant_fields_are_truncated() {
        let charge = PixCharge::new(
            "a@b.c",
            "UM NOME DE LOJA COMPRIDO DEMAIS PARA O CAMPO",
            "CIDADE COM NOME LONGO",
        );
        let payload = charge.payload(100);
        assert!(payload.contains("5925UM NOME DE LOJA COMPRIDO "));
        assert!(payload.contains("6015CIDADE COM NOME"));
    }
}
