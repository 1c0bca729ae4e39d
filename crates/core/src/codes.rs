//! Closed SAF-T (PT) code sets.
//!
//! Each set is parsed once when the tree is built; the rule engine matches on
//! variants instead of comparing strings.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $t:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $t {
            $(
                $(#[$vmeta])*
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $t {
            pub const ALL: &'static [$t] = &[$($t::$variant),+];

            pub fn code(self) -> &'static str {
                match self {
                    $($t::$variant => $code,)+
                }
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.code())
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok($t::$variant),)+
                    other => Err(DomainError::unknown_code($kind, other)),
                }
            }
        }
    };
}

code_enum! {
    /// Sales invoice document types.
    InvoiceType, "invoice type" {
        Invoice => "FT",
        SimplifiedInvoice => "FS",
        InvoiceReceipt => "FR",
        DebitNote => "ND",
        CreditNote => "NC",
    }
}

code_enum! {
    /// Stock movement (transport) document types.
    MovementType, "movement type" {
        DeliveryNote => "GR",
        TransportGuide => "GT",
        FixedAssetsGuide => "GA",
        ConsignmentNote => "GC",
        ReturnNote => "GD",
    }
}

code_enum! {
    /// Working (conference) document types.
    WorkType, "work type" {
        TableConsultation => "CM",
        ConsignmentCredit => "CC",
        ConsignmentInvoice => "FC",
        WorkSheet => "FO",
        PurchaseOrder => "NE",
        Other => "OU",
        Budget => "OR",
        ProForma => "PF",
        IssuedDocument => "DC",
        PremiumReceipt => "RP",
        ChargebackPremium => "RE",
        CoInsurerImputation => "CS",
        LeadCoInsurerImputation => "LD",
        AcceptedReinsurance => "RA",
    }
}

code_enum! {
    /// Receipt types.
    PaymentType, "payment type" {
        /// Receipt issued under the VAT cash regime.
        CashVatReceipt => "RC",
        Receipt => "RG",
    }
}

code_enum! {
    TaxType, "tax type" {
        Iva => "IVA",
        StampDuty => "IS",
        NotSubject => "NS",
    }
}

code_enum! {
    InvoiceStatus, "invoice status" {
        Normal => "N",
        SelfBilled => "S",
        Cancelled => "A",
        Summary => "R",
        Billed => "F",
    }
}

code_enum! {
    MovementStatus, "movement status" {
        Normal => "N",
        ThirdPartyBilled => "T",
        Cancelled => "A",
        Billed => "F",
        Summary => "R",
    }
}

code_enum! {
    WorkStatus, "work status" {
        Normal => "N",
        Cancelled => "A",
        Billed => "F",
    }
}

code_enum! {
    PaymentStatus, "payment status" {
        Normal => "N",
        Cancelled => "A",
    }
}

code_enum! {
    /// Origin of a document: produced here, integrated, or recovered/manual.
    SourceBilling, "source billing" {
        Produced => "P",
        Integrated => "I",
        Manual => "M",
    }
}

code_enum! {
    PaymentMechanism, "payment mechanism" {
        CreditCard => "CC",
        DebitCard => "CD",
        Cheque => "CH",
        InternationalCredit => "CI",
        GiftCheque => "CO",
        Compensation => "CS",
        ElectronicMoney => "DE",
        LetterOfExchange => "LC",
        AtmReference => "MB",
        Cash => "NU",
        Other => "OU",
        Barter => "PR",
        BankTransfer => "TB",
        Voucher => "TR",
    }
}

impl InvoiceType {
    /// Credit notes carry debit lines; everything else carries credit lines.
    pub fn expects_debit_lines(self) -> bool {
        matches!(self, InvoiceType::CreditNote)
    }
}

impl MovementType {
    /// Documents that travel with goods and need full addresses and timing.
    pub fn is_transport(self) -> bool {
        matches!(self, MovementType::DeliveryNote | MovementType::TransportGuide)
    }
}

/// Status codes shared by the four document tables.
pub trait StatusCode: Copy + core::fmt::Display {
    fn is_cancelled(self) -> bool;

    /// Cancelled and billed documents do not count towards table totals.
    fn excluded_from_totals(self) -> bool;
}

impl StatusCode for InvoiceStatus {
    fn is_cancelled(self) -> bool {
        self == InvoiceStatus::Cancelled
    }

    fn excluded_from_totals(self) -> bool {
        matches!(self, InvoiceStatus::Cancelled | InvoiceStatus::Billed)
    }
}

impl StatusCode for MovementStatus {
    fn is_cancelled(self) -> bool {
        self == MovementStatus::Cancelled
    }

    fn excluded_from_totals(self) -> bool {
        matches!(self, MovementStatus::Cancelled | MovementStatus::Billed)
    }
}

impl StatusCode for WorkStatus {
    fn is_cancelled(self) -> bool {
        self == WorkStatus::Cancelled
    }

    fn excluded_from_totals(self) -> bool {
        matches!(self, WorkStatus::Cancelled | WorkStatus::Billed)
    }
}

impl StatusCode for PaymentStatus {
    fn is_cancelled(self) -> bool {
        self == PaymentStatus::Cancelled
    }

    fn excluded_from_totals(self) -> bool {
        self == PaymentStatus::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_text() {
        for t in WorkType::ALL {
            assert_eq!(t.code().parse::<WorkType>().unwrap(), *t);
        }
        for m in PaymentMechanism::ALL {
            assert_eq!(m.to_string().parse::<PaymentMechanism>().unwrap(), *m);
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        let err = "XX".parse::<InvoiceType>().unwrap_err();
        assert_eq!(err, DomainError::unknown_code("invoice type", "XX"));
    }

    #[test]
    fn serde_uses_wire_codes() {
        let json = serde_json::to_string(&TaxType::Iva).unwrap();
        assert_eq!(json, "\"IVA\"");
        let back: InvoiceStatus = serde_json::from_str("\"F\"").unwrap();
        assert_eq!(back, InvoiceStatus::Billed);
        assert!(back.excluded_from_totals());
        assert!(!back.is_cancelled());
    }
}
