//! Orchestration of one validation pass.

use std::path::Path;
use std::sync::Arc;

use saftpt_documents::{AuditFile, SourceTable};
use tracing::{debug, info, info_span, warn};

use crate::chain::{PublicKey, SignatureChainVerifier};
use crate::config::ValidationConfig;
use crate::error::FatalError;
use crate::indexer::DocumentIndex;
use crate::predicates::{
    RuleContext, debit_credit, fields, payments, references, shipment, tax, temporal,
};
use crate::reporter::Reporter;
use crate::rules::{BuiltinCatalog, MessageCatalog, Rule, RuleGroup};
use crate::schema::SchemaValidator;
use crate::totals::TotalsReconciler;

/// Runs indexing, totals, the hash chain and the rule battery over every
/// table of a file, collecting findings in the file's register.
pub struct BusinessRuleValidator {
    catalog: Arc<dyn MessageCatalog>,
    schema: Option<Arc<dyn SchemaValidator>>,
}

impl Default for BusinessRuleValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl BusinessRuleValidator {
    pub fn new() -> Self {
        Self {
            catalog: Arc::new(BuiltinCatalog),
            schema: None,
        }
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn MessageCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_schema_validator(mut self, schema: Arc<dyn SchemaValidator>) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Load the key (when signatures are checked) and validate.
    ///
    /// `Ok(true)` when the register holds no errors afterwards.
    pub fn validate(
        &self,
        audit: &AuditFile,
        public_key_path: Option<&Path>,
        config: &ValidationConfig,
    ) -> Result<bool, FatalError> {
        let key = if config.sign_validation {
            let Some(path) = public_key_path else {
                warn!("signature validation requested without a public key");
                return Err(FatalError::MissingPublicKey);
            };
            match PublicKey::load(path) {
                Ok(key) => Some(key),
                Err(err) => {
                    warn!(error = %err, "public key rejected");
                    return Err(err);
                }
            }
        } else {
            None
        };
        self.validate_with_key(audit, key.as_ref(), config)
    }

    /// Validate with an already loaded key.
    pub fn validate_with_key(
        &self,
        audit: &AuditFile,
        key: Option<&PublicKey>,
        config: &ValidationConfig,
    ) -> Result<bool, FatalError> {
        let key = match (config.sign_validation, key) {
            (true, None) => {
                warn!("signature validation requested without a public key");
                return Err(FatalError::MissingPublicKey);
            }
            (true, Some(key)) => Some(key),
            (false, _) => None,
        };

        let span = info_span!("validate", company = %audit.header.company_name);
        let _enter = span.enter();

        let sources = &audit.source_documents;
        info!(
            sales_invoices = sources.sales_invoices.as_ref().map_or(0, |t| t.invoices.len()),
            movement_of_goods = sources
                .movement_of_goods
                .as_ref()
                .map_or(0, |t| t.stock_movements.len()),
            working_documents = sources
                .working_documents
                .as_ref()
                .map_or(0, |t| t.work_documents.len()),
            payments = sources.payments.as_ref().map_or(0, |t| t.payments.len()),
            sign_validation = config.sign_validation,
            "validation started"
        );

        let register = audit.error_register();
        let reporter = Reporter::new(register, self.catalog.as_ref(), *config);

        if config.schema_validate {
            match &self.schema {
                Some(schema) => {
                    for error in schema.validate(audit) {
                        register.add_lib_xml_error(error);
                    }
                }
                None => reporter.report(Rule::SchemaValidatorMissing, None, &[]),
            }
        }

        let ctx = RuleContext::new(audit, &reporter);
        if config.temporal {
            temporal::check_header(&ctx);
        }

        let verifier = key.map(|key| SignatureChainVerifier::new(key, &reporter));
        if let Some(table) = &sources.sales_invoices {
            validate_table(&ctx, table, verifier.as_ref());
        }
        if let Some(table) = &sources.movement_of_goods {
            validate_table(&ctx, table, verifier.as_ref());
        }
        if let Some(table) = &sources.working_documents {
            validate_table(&ctx, table, verifier.as_ref());
        }
        if let Some(table) = &sources.payments {
            validate_table(&ctx, table, verifier.as_ref());
        }

        let report = register.report();
        let clean = !report.has_errors();
        info!(
            validation_errors = report.validation.len(),
            schema_errors = report.lib_xml.len(),
            warnings = report.warnings.len(),
            clean,
            "validation finished"
        );
        Ok(clean)
    }
}

fn validate_table<T: SourceTable>(
    ctx: &RuleContext<'_>,
    table: &T,
    verifier: Option<&SignatureChainVerifier<'_>>,
) {
    let kind = T::KIND;
    let span = info_span!("table", table = %kind);
    let _enter = span.enter();

    let config = *ctx.reporter.config();
    let on = |group: RuleGroup| config.is_enabled(group);
    let documents = table.documents();

    let index = DocumentIndex::build(kind, documents, ctx.reporter);
    let totals = TotalsReconciler::new(ctx.reporter);
    if on(RuleGroup::Totals) || on(RuleGroup::ZeroColumn) {
        totals.reconcile_table(table);
    }

    for doc in documents {
        fields::check_required(ctx, doc);
        if on(RuleGroup::Numbering) {
            fields::check_line_numbers(ctx, doc);
        }
        if on(RuleGroup::Totals) {
            totals.reconcile_document(doc);
        }
        if on(RuleGroup::Temporal) {
            temporal::check_document(ctx, doc);
        }
        if on(RuleGroup::Tax) {
            tax::check_document(ctx, kind, doc);
        }
        if on(RuleGroup::DebitCredit) {
            debit_credit::check_document(ctx, doc);
        }
        if on(RuleGroup::References) {
            references::check_document(ctx, doc);
        }
        if on(RuleGroup::Shipment) {
            shipment::check_document(ctx, doc);
        }
        if on(RuleGroup::Payments) {
            payments::check_document(ctx, doc);
        }
    }

    for (series, docs) in index.series() {
        if on(RuleGroup::Temporal) {
            temporal::check_series(ctx, &docs);
        }
        if let Some(verifier) = verifier {
            verifier.verify_series(series, &docs);
        }
    }

    debug!(documents = documents.len(), indexed = index.len(), "table validated");
}

/// [`BusinessRuleValidator::validate`] with the built-in catalog and no
/// schema validator.
pub fn validate(
    audit: &AuditFile,
    public_key_path: Option<&Path>,
    config: &ValidationConfig,
) -> Result<bool, FatalError> {
    BusinessRuleValidator::new().validate(audit, public_key_path, config)
}

/// [`BusinessRuleValidator::validate_with_key`] with the built-in catalog
/// and no schema validator.
pub fn validate_with_key(
    audit: &AuditFile,
    key: Option<&PublicKey>,
    config: &ValidationConfig,
) -> Result<bool, FatalError> {
    BusinessRuleValidator::new().validate_with_key(audit, key, config)
}
