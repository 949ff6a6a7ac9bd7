//! The query validation pipeline.
//!
//! Validates SQL for syntax, permissions, and safety before execution, and
//! provides impact estimation and improvement suggestions as independent
//! entry points. Every public method returns a value rather than panicking;
//! a failed validation is a definitive, deterministic answer for the input.

use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use sqlparser::tokenizer::{Token, Tokenizer, Whitespace};
use tracing::warn;

use crate::config::SafetyConfig;
use crate::error::Result;

use super::{
    ImpactEstimate, PatternSet, QueryType, RiskLevel, RowsAffected, ValidationResult,
};

/// How much of the offending SQL is kept in log lines.
const LOG_SQL_MAX_CHARS: usize = 200;

/// Validates SQL queries for safety and permissions.
///
/// Holds only immutable configuration after construction, so a single
/// instance can be shared across threads and reused for any number of calls.
#[derive(Debug)]
pub struct QueryValidator {
    config: SafetyConfig,
    /// Forbidden keywords, uppercased once at construction.
    forbidden_keywords: Vec<String>,
    patterns: PatternSet,
    dialect: GenericDialect,
}

impl QueryValidator {
    /// Creates a validator with the given safety configuration.
    ///
    /// Fails only if a built-in pattern signature does not compile.
    pub fn new(config: SafetyConfig) -> Result<Self> {
        let mut forbidden_keywords: Vec<String> = config
            .forbidden_keywords
            .iter()
            .map(|kw| kw.to_uppercase())
            .collect();
        forbidden_keywords.sort();
        forbidden_keywords.dedup();

        Ok(Self {
            config,
            forbidden_keywords,
            patterns: PatternSet::compile()?,
            dialect: GenericDialect {},
        })
    }

    /// Creates a validator with the default safety configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(SafetyConfig::default())
    }

    /// Validates a SQL query for the given role.
    ///
    /// Stages run strictly in sequence and short-circuit on the first
    /// failure: syntax gate, type classification, permission check, safety
    /// scan, then (for INSERT/UPDATE/DELETE) the modification deep check.
    /// On success the result carries the warnings of every stage that ran,
    /// in stage order.
    pub fn validate(&self, sql: &str, role: &str) -> ValidationResult {
        let syntax = self.validate_syntax(sql);
        if !syntax.is_ok() {
            self.log_rejection("syntax", sql, &syntax);
            return syntax;
        }

        let query_type = self.detect_query_type(sql);

        let permission = self.check_permissions(query_type, role);
        if !permission.is_ok() {
            self.log_rejection("permission", sql, &permission);
            return permission;
        }

        let safety = self.check_safety(sql);
        if !safety.is_ok() {
            self.log_rejection("safety", sql, &safety);
            return safety;
        }

        let mut warnings = syntax.warnings;
        warnings.extend(safety.warnings);

        if query_type.is_modification() {
            let modification = self.validate_modification(sql, query_type);
            if !modification.is_ok() {
                self.log_rejection("modification", sql, &modification);
                return modification;
            }
            warnings.extend(modification.warnings);
        }

        ValidationResult::ok_with_warnings(warnings)
    }

    /// Syntax gate: rejects empty or oversized input, parses the SQL, and
    /// scans comment tokens for forbidden keywords.
    ///
    /// Multiple statements pass with a warning; only the first is ever
    /// considered downstream. That is policy, not a parser limitation.
    pub fn validate_syntax(&self, sql: &str) -> ValidationResult {
        if sql.trim().is_empty() {
            return ValidationResult::fail("Query cannot be empty");
        }

        // Bound pathological input before any parsing or regex work.
        if sql.len() > self.config.max_query_length {
            return ValidationResult::fail(format!(
                "Query exceeds maximum length of {} characters",
                self.config.max_query_length
            ));
        }

        let statements = match Parser::parse_sql(&self.dialect, sql) {
            Ok(statements) => statements,
            Err(e) => return ValidationResult::fail(format!("Invalid SQL syntax: {e}")),
        };

        if statements.is_empty() {
            return ValidationResult::fail("Invalid SQL syntax");
        }

        let mut warnings = Vec::new();
        if statements.len() > 1 {
            warnings
                .push("Multiple statements detected - only the first will be executed".to_string());
        }

        // The AST discards comments, so a keyword hidden in a comment would
        // bypass substring checks on the parsed output. Scan the raw token
        // stream instead.
        let tokens = match Tokenizer::new(&self.dialect, sql).tokenize() {
            Ok(tokens) => tokens,
            Err(e) => return ValidationResult::fail(format!("Invalid SQL syntax: {e}")),
        };

        for token in &tokens {
            let comment = match token {
                Token::Whitespace(Whitespace::SingleLineComment { comment, .. }) => comment,
                Token::Whitespace(Whitespace::MultiLineComment(comment)) => comment,
                _ => continue,
            };
            let upper = comment.to_uppercase();
            if self.forbidden_keywords.iter().any(|kw| upper.contains(kw)) {
                return ValidationResult::fail("Dangerous content detected in comments");
            }
        }

        ValidationResult::ok_with_warnings(warnings)
    }

    /// Classifies a query by its leading keyword.
    ///
    /// Total: unrecognized input degrades to [`QueryType::Unknown`].
    pub fn detect_query_type(&self, sql: &str) -> QueryType {
        let normalized = sql.trim().to_uppercase();
        QueryType::CLASSIFIABLE
            .iter()
            .copied()
            .find(|t| normalized.starts_with(t.as_str()))
            .unwrap_or(QueryType::Unknown)
    }

    /// Checks whether the role may execute the classified operation.
    pub fn check_permissions(&self, query_type: QueryType, role: &str) -> ValidationResult {
        let allowed = self
            .config
            .role(role)
            .map(|r| r.allowed_operations.as_slice())
            .unwrap_or(&[]);

        let permitted = allowed
            .iter()
            .any(|op| op.eq_ignore_ascii_case(query_type.as_str()));

        if !permitted {
            return ValidationResult::fail(format!(
                "Operation {} not allowed for role '{}'",
                query_type, role
            ));
        }

        ValidationResult::ok()
    }

    /// Scans the query text for forbidden keywords and known attack
    /// signatures.
    ///
    /// Forbidden keywords and dangerous patterns reject outright; suspicious
    /// patterns and unqualified UPDATE/DELETE only warn. Whether a
    /// full-table mutation is actually blocked is decided by the
    /// modification check and the permission layer, not here.
    pub fn check_safety(&self, sql: &str) -> ValidationResult {
        let upper = sql.to_uppercase();

        for keyword in &self.forbidden_keywords {
            if upper.contains(keyword) {
                return ValidationResult::fail(format!("Forbidden keyword '{keyword}' detected"));
            }
        }

        if let Some(sig) = self.patterns.find_dangerous(&upper) {
            return ValidationResult::fail(format!("Dangerous pattern detected: {}", sig.pattern));
        }

        let mut warnings: Vec<String> = self
            .patterns
            .find_suspicious(&upper)
            .iter()
            .map(|sig| format!("Suspicious pattern detected: {}", sig.pattern))
            .collect();

        let trimmed = upper.trim_start();
        if (trimmed.starts_with("UPDATE") || trimmed.starts_with("DELETE"))
            && !upper.contains("WHERE")
        {
            warnings.push("UPDATE/DELETE without WHERE clause affects all rows".to_string());
        }

        ValidationResult::ok_with_warnings(warnings)
    }

    /// Deep check for data-modifying queries (INSERT, UPDATE, DELETE).
    ///
    /// This is the authoritative gate for mutations: UPDATE and DELETE
    /// without a WHERE clause fail hard here, unlike the advisory-only
    /// warning in the safety scan.
    pub fn validate_modification(&self, sql: &str, query_type: QueryType) -> ValidationResult {
        let parses = matches!(
            Parser::parse_sql(&self.dialect, sql),
            Ok(ref statements) if !statements.is_empty()
        );
        if !parses {
            return ValidationResult::fail("Cannot parse modification query");
        }

        let upper = sql.to_uppercase();
        let mut warnings = Vec::new();

        match query_type {
            QueryType::Insert => {
                if self.patterns.has_values_clause(&upper) {
                    // Approximate row counting: the `),(` separator count is
                    // a policy knob, not an exact tuple parse. Literal
                    // parenthesized expressions can miscount.
                    let values_count = upper.matches("VALUES").count();
                    if values_count > 1 || sql.matches("),(").count() > 10 {
                        warnings.push("Bulk insert operation detected".to_string());
                    }
                }
            }
            QueryType::Update => {
                if !upper.contains("WHERE") {
                    return ValidationResult::fail("UPDATE queries must include WHERE clause");
                }
                if self.patterns.updates_primary_key(sql) {
                    warnings.push("Updating primary key column detected".to_string());
                }
            }
            QueryType::Delete => {
                if !upper.contains("WHERE") {
                    return ValidationResult::fail("DELETE queries must include WHERE clause");
                }
                if upper.contains("CASCADE") {
                    warnings.push("Cascade delete operation detected".to_string());
                }
            }
            _ => {}
        }

        ValidationResult::ok_with_warnings(warnings)
    }

    /// Estimates the potential impact of a query, independent of role and of
    /// whether validation passed.
    pub fn estimate_impact(&self, sql: &str) -> ImpactEstimate {
        let query_type = self.detect_query_type(sql);
        let upper = sql.to_uppercase();
        let has_where = upper.contains("WHERE");

        let mut impact = ImpactEstimate {
            query_type,
            risk_level: RiskLevel::Low,
            estimated_rows_affected: RowsAffected::Unknown,
            requires_confirmation: false,
            reversible: true,
        };

        match query_type {
            QueryType::Select => {
                impact.risk_level = RiskLevel::None;
            }
            QueryType::Insert => {
                impact.risk_level = RiskLevel::Low;
            }
            QueryType::Update => {
                impact.risk_level = RiskLevel::Medium;
                impact.requires_confirmation = true;
                if !has_where {
                    impact.risk_level = RiskLevel::High;
                    impact.estimated_rows_affected = RowsAffected::All;
                }
            }
            QueryType::Delete => {
                impact.risk_level = RiskLevel::High;
                impact.requires_confirmation = true;
                impact.reversible = false;
                if !has_where {
                    impact.risk_level = RiskLevel::Critical;
                    impact.estimated_rows_affected = RowsAffected::All;
                }
            }
            QueryType::Drop | QueryType::Truncate => {
                impact.risk_level = RiskLevel::Critical;
                impact.requires_confirmation = true;
                impact.reversible = false;
                impact.estimated_rows_affected = RowsAffected::All;
            }
            _ => {}
        }

        if self.config.needs_confirmation(query_type.as_str()) {
            impact.requires_confirmation = true;
        }

        impact
    }

    /// Produces advisory suggestions for improving a query.
    ///
    /// Never rejects anything; an empty list means no advice.
    pub fn suggestions(&self, sql: &str) -> Vec<String> {
        let query_type = self.detect_query_type(sql);
        let upper = sql.to_uppercase();
        let mut suggestions = Vec::new();

        match query_type {
            QueryType::Select => {
                if !upper.contains("LIMIT") {
                    suggestions
                        .push("Consider adding LIMIT clause to restrict result size".to_string());
                }
                if !upper.contains("ORDER BY") && !upper.contains("GROUP BY") {
                    suggestions
                        .push("Consider adding ORDER BY clause for consistent results".to_string());
                }
            }
            QueryType::Update | QueryType::Delete => {
                if !upper.contains("WHERE") {
                    suggestions.push("Add WHERE clause to avoid affecting all rows".to_string());
                }
                if !upper.contains("LIMIT") {
                    suggestions
                        .push("Consider adding LIMIT clause to restrict affected rows".to_string());
                }
            }
            QueryType::Insert => {
                if upper.contains("SELECT") {
                    suggestions
                        .push("Verify INSERT ... SELECT query affects expected rows".to_string());
                }
            }
            _ => {}
        }

        if sql.len() > 1000 {
            suggestions.push("Consider breaking complex queries into smaller parts".to_string());
        }

        if upper.matches("JOIN").count() > 3 {
            suggestions.push("Review complex JOIN operations for performance".to_string());
        }

        suggestions
    }

    fn log_rejection(&self, stage: &str, sql: &str, result: &ValidationResult) {
        let reason = result.error_message.as_deref().unwrap_or("unknown");
        warn!(
            stage,
            sql = %truncate_for_log(sql),
            "query rejected: {reason}"
        );
    }
}

/// Truncates SQL for log lines so oversized input cannot flood the log.
fn truncate_for_log(sql: &str) -> String {
    if sql.chars().count() <= LOG_SQL_MAX_CHARS {
        sql.to_string()
    } else {
        let mut truncated: String = sql.chars().take(LOG_SQL_MAX_CHARS).collect();
        truncated.push_str("...");
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoleConfig;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn validator() -> QueryValidator {
        QueryValidator::with_defaults().unwrap()
    }

    // === Construction ===

    #[test]
    fn test_forbidden_keywords_normalized_and_deduplicated() {
        let config = SafetyConfig {
            forbidden_keywords: vec![
                "exec".to_string(),
                "DROP".to_string(),
                "drop".to_string(),
                "EXEC".to_string(),
            ],
            ..SafetyConfig::default()
        };
        let v = QueryValidator::new(config).unwrap();
        assert_eq!(v.forbidden_keywords, vec!["DROP", "EXEC"]);
    }

    // === Syntax gate ===

    #[test]
    fn test_empty_query_rejected() {
        let result = validator().validate("", "admin");
        assert!(!result.is_ok());
        assert_eq!(result.error_message.as_deref(), Some("Query cannot be empty"));
    }

    #[test]
    fn test_whitespace_only_rejected() {
        let result = validator().validate("   \n\t  ", "admin");
        assert_eq!(result.error_message.as_deref(), Some("Query cannot be empty"));
    }

    #[test]
    fn test_oversized_query_rejected() {
        let config = SafetyConfig {
            max_query_length: 50,
            ..SafetyConfig::default()
        };
        let v = QueryValidator::new(config).unwrap();
        let sql = format!("SELECT * FROM customers WHERE name = '{}'", "x".repeat(60));
        let result = v.validate_syntax(&sql);
        assert!(!result.is_ok());
        assert!(result
            .error_message
            .unwrap()
            .contains("maximum length of 50"));
    }

    #[test]
    fn test_unparsable_sql_rejected() {
        let result = validator().validate_syntax("THIS IS NOT SQL");
        assert!(!result.is_ok());
        assert!(result.error_message.unwrap().contains("Invalid SQL syntax"));
    }

    #[test]
    fn test_multiple_statements_warn() {
        let result = validator().validate_syntax("SELECT 1; SELECT 2");
        assert!(result.is_ok());
        assert_eq!(
            result.warnings,
            vec!["Multiple statements detected - only the first will be executed"]
        );
    }

    #[test]
    fn test_forbidden_keyword_in_line_comment() {
        let result = validator().validate_syntax("SELECT * FROM x -- DROP TABLE x");
        assert!(!result.is_ok());
        assert_eq!(
            result.error_message.as_deref(),
            Some("Dangerous content detected in comments")
        );
    }

    #[test]
    fn test_forbidden_keyword_in_block_comment() {
        let result = validator().validate_syntax("SELECT * /* drop table x */ FROM x");
        assert!(!result.is_ok());
        assert_eq!(
            result.error_message.as_deref(),
            Some("Dangerous content detected in comments")
        );
    }

    #[test]
    fn test_harmless_comment_passes() {
        let result = validator().validate_syntax("SELECT * FROM x -- fetch everything");
        assert!(result.is_ok());
    }

    // === Type classification ===

    #[test]
    fn test_detect_query_type() {
        let v = validator();
        assert_eq!(v.detect_query_type("SELECT 1"), QueryType::Select);
        assert_eq!(v.detect_query_type("  insert into t values (1)"), QueryType::Insert);
        assert_eq!(v.detect_query_type("UpDaTe t SET a = 1"), QueryType::Update);
        assert_eq!(v.detect_query_type("delete from t where id = 1"), QueryType::Delete);
        assert_eq!(v.detect_query_type("CREATE TABLE t (id INT)"), QueryType::Create);
        assert_eq!(v.detect_query_type("DROP TABLE t"), QueryType::Drop);
        assert_eq!(v.detect_query_type("ALTER TABLE t ADD c INT"), QueryType::Alter);
        assert_eq!(v.detect_query_type("TRUNCATE TABLE t"), QueryType::Truncate);
        assert_eq!(v.detect_query_type("GRANT SELECT ON t TO u"), QueryType::Grant);
        assert_eq!(v.detect_query_type("REVOKE SELECT ON t FROM u"), QueryType::Revoke);
        assert_eq!(v.detect_query_type("EXPLAIN SELECT 1"), QueryType::Unknown);
        assert_eq!(v.detect_query_type(""), QueryType::Unknown);
    }

    // === Permissions ===

    #[test]
    fn test_viewer_can_select() {
        let result = validator().check_permissions(QueryType::Select, "viewer");
        assert!(result.is_ok());
    }

    #[test]
    fn test_viewer_cannot_delete() {
        let result = validator().check_permissions(QueryType::Delete, "viewer");
        assert!(!result.is_ok());
        assert_eq!(
            result.error_message.as_deref(),
            Some("Operation DELETE not allowed for role 'viewer'")
        );
    }

    #[test]
    fn test_unknown_role_falls_back_to_user() {
        let v = validator();
        assert!(v.check_permissions(QueryType::Delete, "intern").is_ok());
        assert!(!v.check_permissions(QueryType::Drop, "intern").is_ok());
    }

    #[test]
    fn test_empty_role_table_denies_everything() {
        let config = SafetyConfig {
            roles: HashMap::new(),
            ..SafetyConfig::default()
        };
        let v = QueryValidator::new(config).unwrap();
        let result = v.check_permissions(QueryType::Select, "admin");
        assert!(!result.is_ok());
    }

    #[test]
    fn test_permissions_case_insensitive() {
        let mut roles = HashMap::new();
        roles.insert(
            "user".to_string(),
            RoleConfig {
                allowed_operations: vec!["select".to_string()],
                max_results: 100,
            },
        );
        let v = QueryValidator::new(SafetyConfig {
            roles,
            ..SafetyConfig::default()
        })
        .unwrap();
        assert!(v.check_permissions(QueryType::Select, "user").is_ok());
    }

    // === Safety scan ===

    #[test]
    fn test_forbidden_keyword_detected() {
        let result = validator().check_safety("SELECT * FROM t WHERE x = 'xp_cmdshell'");
        assert!(!result.is_ok());
        assert_eq!(
            result.error_message.as_deref(),
            Some("Forbidden keyword 'XP_CMDSHELL' detected")
        );
    }

    #[test]
    fn test_dangerous_chained_drop_rejected() {
        // DROP is also a forbidden keyword, so the keyword scan wins.
        let result = validator().check_safety("SELECT 1; DROP TABLE t");
        assert!(!result.is_ok());
        assert_eq!(
            result.error_message.as_deref(),
            Some("Forbidden keyword 'DROP' detected")
        );
    }

    #[test]
    fn test_dangerous_pattern_without_forbidden_keyword() {
        let config = SafetyConfig {
            forbidden_keywords: vec![],
            ..SafetyConfig::default()
        };
        let v = QueryValidator::new(config).unwrap();
        let result = v.check_safety("SELECT 1; DROP TABLE t");
        assert!(!result.is_ok());
        assert!(result
            .error_message
            .unwrap()
            .starts_with("Dangerous pattern detected:"));
    }

    #[test]
    fn test_tautology_warns_but_passes() {
        let result = validator().check_safety("SELECT * FROM t WHERE 1=1");
        assert!(result.is_ok());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.starts_with("Suspicious pattern detected:")));
    }

    #[test]
    fn test_update_without_where_warns_in_safety_scan() {
        let result = validator().check_safety("UPDATE t SET a = 1");
        assert!(result.is_ok());
        assert!(result
            .warnings
            .contains(&"UPDATE/DELETE without WHERE clause affects all rows".to_string()));
    }

    #[test]
    fn test_clean_select_no_warnings() {
        let result = validator().check_safety("SELECT name FROM customers");
        assert!(result.is_ok());
        assert!(result.warnings.is_empty());
    }

    // === Modification deep check ===

    #[test]
    fn test_update_without_where_fails_hard() {
        let result = validator().validate_modification("UPDATE t SET a = 1", QueryType::Update);
        assert!(!result.is_ok());
        assert_eq!(
            result.error_message.as_deref(),
            Some("UPDATE queries must include WHERE clause")
        );
    }

    #[test]
    fn test_delete_without_where_fails_hard() {
        let result = validator().validate_modification("DELETE FROM t", QueryType::Delete);
        assert_eq!(
            result.error_message.as_deref(),
            Some("DELETE queries must include WHERE clause")
        );
    }

    #[test]
    fn test_update_primary_key_warns() {
        let result = validator()
            .validate_modification("UPDATE t SET customer_id = 7 WHERE id = 3", QueryType::Update);
        assert!(result.is_ok());
        assert_eq!(result.warnings, vec!["Updating primary key column detected"]);
    }

    #[test]
    fn test_update_pk_in_later_assignment_warns() {
        let result = validator().validate_modification(
            "UPDATE customers SET name = 'x', customer_id = 7 WHERE id = 3",
            QueryType::Update,
        );
        assert!(result.is_ok());
        assert_eq!(result.warnings, vec!["Updating primary key column detected"]);
    }

    #[test]
    fn test_cascade_delete_warns() {
        // The scan is textual; CASCADE anywhere in the statement counts.
        let result = validator()
            .validate_modification("DELETE FROM t WHERE kind = 'cascade'", QueryType::Delete);
        assert!(result.is_ok());
        assert_eq!(result.warnings, vec!["Cascade delete operation detected"]);
    }

    #[test]
    fn test_bulk_insert_warns() {
        let rows: Vec<String> = (0..15).map(|i| format!("({i})")).collect();
        let sql = format!("INSERT INTO t (a) VALUES {}", rows.join(","));
        let result = validator().validate_modification(&sql, QueryType::Insert);
        assert!(result.is_ok());
        assert_eq!(result.warnings, vec!["Bulk insert operation detected"]);
    }

    #[test]
    fn test_small_insert_no_warning() {
        let result = validator()
            .validate_modification("INSERT INTO t (a) VALUES (1), (2)", QueryType::Insert);
        assert!(result.is_ok());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_unparsable_modification_fails() {
        let result = validator().validate_modification("UPDATE WHERE", QueryType::Update);
        assert_eq!(
            result.error_message.as_deref(),
            Some("Cannot parse modification query")
        );
    }

    // === Orchestration ===

    #[test]
    fn test_valid_select_for_viewer() {
        let result = validator().validate("SELECT * FROM customers;", "viewer");
        assert!(result.is_ok());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_delete_without_where_fails_for_admin() {
        let result = validator().validate("DELETE FROM customers;", "admin");
        assert!(!result.is_ok());
        assert_eq!(
            result.error_message.as_deref(),
            Some("DELETE queries must include WHERE clause")
        );
    }

    #[test]
    fn test_comment_hidden_drop_fails_before_anything_else() {
        let result = validator().validate("SELECT * FROM x; -- DROP TABLE x", "admin");
        assert!(!result.is_ok());
        assert_eq!(
            result.error_message.as_deref(),
            Some("Dangerous content detected in comments")
        );
    }

    #[test]
    fn test_update_pk_without_where_short_circuits() {
        let result = validator().validate("UPDATE customers SET id = 5;", "admin");
        assert!(!result.is_ok());
        assert_eq!(
            result.error_message.as_deref(),
            Some("UPDATE queries must include WHERE clause")
        );
        // Hard failure short-circuits; the primary-key warning never lands.
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_warnings_union_in_stage_order() {
        let result = validator().validate(
            "UPDATE customers SET customer_id = 5 WHERE region = 'EU'; SELECT 1",
            "admin",
        );
        assert!(result.is_ok());
        assert_eq!(
            result.warnings,
            vec![
                "Multiple statements detected - only the first will be executed",
                "Updating primary key column detected",
            ]
        );
    }

    #[test]
    fn test_validation_is_deterministic() {
        let v = validator();
        let sql = "UPDATE customers SET status = 'x' WHERE 1=1";
        let first = v.validate(sql, "user");
        let second = v.validate(sql, "user");
        assert_eq!(first, second);
    }

    // === Impact estimation ===

    #[test]
    fn test_impact_select() {
        let impact = validator().estimate_impact("SELECT * FROM customers");
        assert_eq!(impact.query_type, QueryType::Select);
        assert_eq!(impact.risk_level, RiskLevel::None);
        assert!(!impact.requires_confirmation);
        assert!(impact.reversible);
    }

    #[test]
    fn test_impact_insert_requires_confirmation_by_policy() {
        // INSERT's baseline needs no confirmation, but the default policy
        // lists it in the confirmation-required set.
        let impact = validator().estimate_impact("INSERT INTO t VALUES (1)");
        assert_eq!(impact.risk_level, RiskLevel::Low);
        assert!(impact.requires_confirmation);
        assert!(impact.reversible);
    }

    #[test]
    fn test_impact_update_with_where() {
        let impact = validator().estimate_impact("UPDATE t SET a = 1 WHERE id = 2");
        assert_eq!(impact.risk_level, RiskLevel::Medium);
        assert_eq!(impact.estimated_rows_affected, RowsAffected::Unknown);
        assert!(impact.requires_confirmation);
    }

    #[test]
    fn test_impact_update_without_where_escalates() {
        let impact = validator().estimate_impact("UPDATE t SET a = 1");
        assert_eq!(impact.risk_level, RiskLevel::High);
        assert_eq!(impact.estimated_rows_affected, RowsAffected::All);
    }

    #[test]
    fn test_impact_delete_without_where_is_critical() {
        let impact = validator().estimate_impact("DELETE FROM t");
        assert_eq!(impact.risk_level, RiskLevel::Critical);
        assert_eq!(impact.estimated_rows_affected, RowsAffected::All);
        assert!(!impact.reversible);
    }

    #[test]
    fn test_impact_drop_is_critical() {
        let impact = validator().estimate_impact("DROP TABLE customers;");
        assert_eq!(impact.risk_level, RiskLevel::Critical);
        assert_eq!(impact.estimated_rows_affected, RowsAffected::All);
        assert!(impact.requires_confirmation);
        assert!(!impact.reversible);
    }

    #[test]
    fn test_impact_unknown_type_is_low() {
        let impact = validator().estimate_impact("EXPLAIN SELECT 1");
        assert_eq!(impact.query_type, QueryType::Unknown);
        assert_eq!(impact.risk_level, RiskLevel::Low);
    }

    // === Suggestions ===

    #[test]
    fn test_select_suggestions() {
        let suggestions = validator().suggestions("SELECT * FROM orders;");
        assert!(suggestions
            .iter()
            .any(|s| s.contains("LIMIT")));
        assert!(suggestions
            .iter()
            .any(|s| s.contains("ORDER BY")));
    }

    #[test]
    fn test_select_with_limit_and_order_by_no_suggestions() {
        let suggestions =
            validator().suggestions("SELECT * FROM orders ORDER BY id LIMIT 10");
        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_delete_suggestions() {
        let suggestions = validator().suggestions("DELETE FROM orders");
        assert!(suggestions
            .contains(&"Add WHERE clause to avoid affecting all rows".to_string()));
        assert!(suggestions
            .contains(&"Consider adding LIMIT clause to restrict affected rows".to_string()));
    }

    #[test]
    fn test_insert_select_suggestion() {
        let suggestions = validator().suggestions("INSERT INTO backup SELECT * FROM orders");
        assert_eq!(
            suggestions,
            vec!["Verify INSERT ... SELECT query affects expected rows"]
        );
    }

    #[test]
    fn test_long_query_suggestion() {
        let sql = format!("SELECT * FROM t WHERE a IN ({})", "1,".repeat(600));
        let suggestions = validator().suggestions(&sql);
        assert!(suggestions
            .contains(&"Consider breaking complex queries into smaller parts".to_string()));
    }

    #[test]
    fn test_many_joins_suggestion() {
        let sql = "SELECT * FROM a \
                   JOIN b ON a.id = b.a_id \
                   JOIN c ON b.id = c.b_id \
                   JOIN d ON c.id = d.c_id \
                   JOIN e ON d.id = e.d_id \
                   ORDER BY a.id LIMIT 5";
        let suggestions = validator().suggestions(sql);
        assert_eq!(
            suggestions,
            vec!["Review complex JOIN operations for performance"]
        );
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("SELECT 1"), "SELECT 1");
        let long = "x".repeat(500);
        let truncated = truncate_for_log(&long);
        assert_eq!(truncated.chars().count(), LOG_SQL_MAX_CHARS + 3);
        assert!(truncated.ends_with("..."));
    }
}
