//! Per-series hash chain verification.
//!
//! Every signed document carries, in `Hash`, an RSA PKCS#1 v1.5 / SHA-1
//! signature over its canonical message, and that message embeds the hash
//! of the previous document of the same series. Changing any earlier
//! document therefore breaks the signature of the next one.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{NaiveDate, NaiveDateTime};
use rsa::RsaPublicKey;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::signature::Verifier;
use rust_decimal::Decimal;
use sha1::Sha1;

use saftpt_core::{DATE_FORMAT, DATE_TIME_FORMAT, SeriesKey, format_money};
use saftpt_documents::SourceDocument;

use crate::error::FatalError;
use crate::reporter::Reporter;
use crate::rules::Rule;

/// `HashControl` value of documents signed by the producing software.
pub const SELF_SIGNED: &str = "1";

/// The string that is signed: `Date;SystemEntryDate;DocumentNumber;GrossTotal;PreviousHash`.
pub fn canonical_message(
    date: NaiveDate,
    system_entry_date: NaiveDateTime,
    document_number: &str,
    gross_total: Decimal,
    previous_hash: &str,
) -> String {
    format!(
        "{};{};{};{};{}",
        date.format(DATE_FORMAT),
        system_entry_date.format(DATE_TIME_FORMAT),
        document_number,
        format_money(gross_total),
        previous_hash
    )
}

/// Software producer's RSA public key, ready to check SHA-1 signatures.
pub struct PublicKey {
    key: VerifyingKey<Sha1>,
}

impl core::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PublicKey(RSA/SHA-1)")
    }
}

impl PublicKey {
    pub fn from_rsa(key: RsaPublicKey) -> Self {
        Self {
            key: VerifyingKey::new(key),
        }
    }

    /// Parse a PEM `PUBLIC KEY` (SPKI) or `RSA PUBLIC KEY` (PKCS#1) block.
    pub fn from_pem(pem: &str, origin: &str) -> Result<Self, FatalError> {
        let key = match RsaPublicKey::from_public_key_pem(pem) {
            Ok(key) => key,
            Err(spki) => {
                RsaPublicKey::from_pkcs1_pem(pem).map_err(|pkcs1| FatalError::InvalidPublicKey {
                    origin: origin.to_string(),
                    reason: format!("not an SPKI key ({spki}) nor a PKCS#1 key ({pkcs1})"),
                })?
            }
        };
        Ok(Self::from_rsa(key))
    }

    /// Read and parse a PEM file.
    pub fn load(path: &Path) -> Result<Self, FatalError> {
        let pem =
            std::fs::read_to_string(path).map_err(|source| FatalError::PublicKeyUnreadable {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_pem(&pem, &path.display().to_string())
    }

    /// Check a base64 signature over `message`. The error is a short reason.
    pub fn verify(&self, message: &str, signature: &str) -> Result<(), &'static str> {
        let bytes = STANDARD.decode(signature.trim()).map_err(|_| "hash is not valid base64")?;
        let signature = Signature::try_from(bytes.as_slice())
            .map_err(|_| "hash is not an RSA signature")?;
        self.key
            .verify(message.as_bytes(), &signature)
            .map_err(|_| "signature does not match")
    }
}

/// Walks each indexed series in number order with a previous-hash cursor.
pub struct SignatureChainVerifier<'a> {
    key: &'a PublicKey,
    reporter: &'a Reporter<'a>,
}

impl<'a> SignatureChainVerifier<'a> {
    pub fn new(key: &'a PublicKey, reporter: &'a Reporter<'a>) -> Self {
        Self { key, reporter }
    }

    /// Verify one series given in ascending number order. Returns the number
    /// of documents whose signature failed.
    ///
    /// A failure does not stop the walk, and the cursor always moves to the
    /// declared hash of the document just visited, so one tampered document
    /// is reported once and its successor is judged against what the file
    /// says, not against what it should have said.
    pub fn verify_series<D: SourceDocument>(&self, series: &SeriesKey, docs: &[&D]) -> usize {
        let mut previous = "";
        let mut failures = 0;
        let mut verified = 0;

        for &doc in docs {
            let Some(fields) = doc.hash_fields() else {
                continue;
            };

            if fields.hash_control == SELF_SIGNED {
                if let Err(reason) = self.verify_document(doc, fields.hash, previous) {
                    let number = doc.document_number();
                    self.reporter.report(
                        Rule::HashSignatureInvalid,
                        Some(number),
                        &[&number, series, &reason],
                    );
                    failures += 1;
                } else {
                    verified += 1;
                }
            }
            previous = fields.hash;
        }

        tracing::debug!(
            series = %series,
            documents = docs.len(),
            verified,
            failures,
            "hash chain walked"
        );
        failures
    }

    fn verify_document<D: SourceDocument>(
        &self,
        doc: &D,
        hash: &str,
        previous: &str,
    ) -> Result<(), &'static str> {
        let (Some(date), Some(entry), Some(gross)) =
            (doc.date().get(), doc.system_entry_date().get(), doc.totals().gross_total.get())
        else {
            return Err("date, system entry date or gross total is missing");
        };
        if hash.is_empty() {
            return Err("hash is empty");
        }
        let message = canonical_message(date, entry, doc.document_number(), gross, previous);
        self.key.verify(&message, hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationConfig;
    use crate::indexer::DocumentIndex;
    use crate::rules::BuiltinCatalog;
    use rsa::RsaPrivateKey;
    use rsa::pkcs1::EncodeRsaPublicKey;
    use rsa::pkcs1v15::SigningKey;
    use rsa::pkcs8::{EncodePublicKey, LineEnding};
    use rsa::signature::{SignatureEncoding, Signer};
    use rust_decimal_macros::dec;
    use saftpt_core::{ErrorRegister, InvoiceType};
    use saftpt_documents::{DocumentTotals, Invoice, TableKind};
    use std::sync::OnceLock;

    fn private_key() -> &'static RsaPrivateKey {
        static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
        KEY.get_or_init(|| RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap())
    }

    fn public_key() -> PublicKey {
        PublicKey::from_rsa(private_key().to_public_key())
    }

    fn sign(message: &str) -> String {
        let key = SigningKey::<Sha1>::new(private_key().clone());
        STANDARD.encode(key.sign(message.as_bytes()).to_bytes())
    }

    fn invoice(n: u64, gross: Decimal) -> Invoice {
        let date = NaiveDate::from_ymd_opt(2024, 1, n as u32).unwrap();
        Invoice::new(
            format!("FT A/{n}"),
            InvoiceType::Invoice,
            date,
            date.and_hms_opt(10, 0, 0).unwrap(),
            "C1",
        )
        .with_totals(DocumentTotals::new(gross, Decimal::ZERO, gross))
    }

    fn sign_chain(docs: &mut [Invoice]) {
        let mut previous = String::new();
        for doc in docs.iter_mut() {
            let message = canonical_message(
                doc.invoice_date.get().unwrap(),
                doc.system_entry_date.get().unwrap(),
                &doc.invoice_no,
                doc.document_totals.gross_total.get().unwrap(),
                &previous,
            );
            doc.hash = sign(&message);
            previous = doc.hash.clone();
        }
    }

    fn walk(docs: &[Invoice]) -> (ErrorRegister, usize) {
        let register = ErrorRegister::new();
        let failures = {
            let reporter = Reporter::new(&register, &BuiltinCatalog, ValidationConfig::default());
            let index = DocumentIndex::build(TableKind::SalesInvoices, docs, &reporter);
            let key = public_key();
            let verifier = SignatureChainVerifier::new(&key, &reporter);
            index
                .series()
                .map(|(series, docs)| verifier.verify_series(series, &docs))
                .sum()
        };
        (register, failures)
    }

    fn failing_documents(register: &ErrorRegister) -> Vec<String> {
        register
            .validation_errors()
            .into_iter()
            .filter(|e| e.code == "hash_signature_invalid")
            .filter_map(|e| e.document)
            .collect()
    }

    #[test]
    fn canonical_message_layout() {
        let message = canonical_message(
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(14, 7, 9).unwrap(),
            "FT A/12",
            dec!(1234.565),
            "",
        );
        assert_eq!(message, "2024-03-05;2024-03-05T14:07:09;FT A/12;1234.57;");

        let next = canonical_message(
            NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 6).unwrap().and_hms_opt(8, 0, 0).unwrap(),
            "FT A/13",
            dec!(10),
            "abc=",
        );
        assert_eq!(next, "2024-03-06;2024-03-06T08:00:00;FT A/13;10.00;abc=");
    }

    #[test]
    fn untouched_chain_verifies() {
        let mut docs = vec![invoice(1, dec!(10)), invoice(2, dec!(20)), invoice(3, dec!(30))];
        sign_chain(&mut docs);
        let (register, failures) = walk(&docs);
        assert_eq!(failures, 0);
        assert!(!register.has_errors(), "{:?}", register.validation_errors());
    }

    #[test]
    fn tampered_hash_breaks_itself_and_its_successor_only() {
        let mut docs = vec![invoice(1, dec!(10)), invoice(2, dec!(20)), invoice(3, dec!(30))];
        sign_chain(&mut docs);
        docs[0].hash = sign("something else entirely");

        let (register, failures) = walk(&docs);

        assert_eq!(failures, 2);
        assert_eq!(failing_documents(&register), vec!["FT A/1", "FT A/2"]);
    }

    #[test]
    fn externally_produced_document_still_feeds_the_chain() {
        let mut docs = vec![invoice(1, dec!(10)), invoice(2, dec!(20)), invoice(3, dec!(30))];
        sign_chain(&mut docs);
        docs[0].hash_control = "0".to_string();
        docs[0].hash = sign("recovered document");

        let (register, _) = walk(&docs);

        assert_eq!(failing_documents(&register), vec!["FT A/2"]);
    }

    #[test]
    fn changed_gross_total_is_detected() {
        let mut docs = vec![invoice(1, dec!(10)), invoice(2, dec!(20))];
        sign_chain(&mut docs);
        docs[1].document_totals = DocumentTotals::new(dec!(21), Decimal::ZERO, dec!(21));

        let (register, _) = walk(&docs);

        assert_eq!(failing_documents(&register), vec!["FT A/2"]);
    }

    #[test]
    fn garbage_hash_is_reported_not_fatal() {
        let mut docs = vec![invoice(1, dec!(10)), invoice(2, dec!(20))];
        sign_chain(&mut docs);
        docs[0].hash = "%%% not base64 %%%".to_string();

        let (register, failures) = walk(&docs);

        assert_eq!(failures, 2);
        let errors = register.validation_errors();
        assert!(errors[0].message.contains("not valid base64"));
    }

    #[test]
    fn series_are_independent() {
        let mut a = vec![invoice(1, dec!(10)), invoice(2, dec!(20))];
        let mut b: Vec<Invoice> = vec![invoice(1, dec!(5)), invoice(2, dec!(6))]
            .into_iter()
            .map(|mut d| {
                d.invoice_no = d.invoice_no.replace(" A/", " B/");
                d
            })
            .collect();
        sign_chain(&mut a);
        sign_chain(&mut b);
        b[1].hash = sign("forged");
        a.extend(b);

        let (register, _) = walk(&a);

        assert_eq!(failing_documents(&register), vec!["FT B/2"]);
    }

    #[test]
    fn signature_findings_follow_the_config() {
        let mut docs = vec![invoice(1, dec!(10))];
        sign_chain(&mut docs);
        docs[0].hash = sign("forged");

        let register = ErrorRegister::new();
        let reporter = Reporter::new(
            &register,
            &BuiltinCatalog,
            ValidationConfig::default().with_sign_validation(false),
        );
        let key = public_key();
        let verifier = SignatureChainVerifier::new(&key, &reporter);
        let refs: Vec<&Invoice> = docs.iter().collect();
        let series = "FT A/1"
            .parse::<saftpt_core::DocumentNumber>()
            .unwrap()
            .series_key();
        verifier.verify_series(&series, &refs);

        assert!(!register.has_errors());
    }

    #[test]
    fn pem_keys_in_both_encodings_load() {
        let public = private_key().to_public_key();
        let spki = public.to_public_key_pem(LineEnding::LF).unwrap();
        let pkcs1 = public.to_pkcs1_pem(LineEnding::LF).unwrap();

        let mut docs = vec![invoice(1, dec!(10))];
        sign_chain(&mut docs);
        let message = canonical_message(
            docs[0].invoice_date.get().unwrap(),
            docs[0].system_entry_date.get().unwrap(),
            &docs[0].invoice_no,
            dec!(10),
            "",
        );

        for pem in [spki.as_str(), pkcs1.as_str()] {
            let key = PublicKey::from_pem(pem, "test").unwrap();
            assert!(key.verify(&message, &docs[0].hash).is_ok());
        }
    }

    #[test]
    fn unparsable_pem_is_fatal() {
        let pem = "-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----\n";
        let err = PublicKey::from_pem(pem, "inline").unwrap_err();
        assert!(matches!(err, FatalError::InvalidPublicKey { .. }));
    }

    #[test]
    fn missing_key_file_is_fatal() {
        let err = PublicKey::load(Path::new("/nonexistent/saftpt/key.pem")).unwrap_err();
        assert!(matches!(err, FatalError::PublicKeyUnreadable { .. }));
    }
}
