//! Messaging schema variants and the precedence table that selects one.
//!
//! Deployments carry one of two historical conversation layouts (and, during
//! migration, sometimes both). The detector gathers existence facts about the
//! candidate tables into a [`SchemaProbeReport`] and [`SchemaProbeReport::decide`]
//! turns those facts into a [`SchemaDetection`] using a fixed precedence.

use std::fmt;

/// Conversation table of the legacy PascalCase layout.
pub const LEGACY_CONVERSATION_TABLE: &str = "Conversation";
/// Conversation table shared by the snake_case layouts.
pub const MODERN_CONVERSATION_TABLE: &str = "conversations";
/// Participant columns marking the PascalCase legacy layout.
pub const LEGACY_PARTICIPANT_COLUMNS: [&str; 2] = ["aId", "bId"];
/// Participant columns marking the legacy layout migrated to snake_case names.
pub const SNAKE_LEGACY_PARTICIPANT_COLUMNS: [&str; 2] = ["a_id", "b_id"];
/// Participant columns marking the current layout.
pub const MODERN_PARTICIPANT_COLUMNS: [&str; 2] = ["sender_id", "receiver_id"];

/// Identifier casing of a legacy conversation layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacyLayout {
    /// Quoted PascalCase tables and camelCase columns (`"Conversation"."aId"`).
    PascalCase,
    /// The same shape renamed to snake_case (`conversations.a_id`).
    SnakeCase,
}

/// Relational layout live in the current deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVariant {
    /// Profile-keyed participants `a`/`b` with an activity flag.
    Prisma(LegacyLayout),
    /// User-keyed sender/receiver participants.
    Supabase,
    /// No conversation tables were found.
    None,
}

impl SchemaVariant {
    /// Upper-case label used in logs and diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            Self::Prisma(_) => "PRISMA",
            Self::Supabase => "SUPABASE",
            Self::None => "NONE",
        }
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Diagnostic code explaining which precedence rule matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectionReason {
    /// A profile row exists and the legacy table has legacy columns.
    FoundProfileAndLegacyTable,
    /// The legacy table has legacy columns.
    FoundLegacyTable,
    /// The modern table has sender/receiver columns.
    FoundModernColumns,
    /// The modern table still carries snake_case legacy columns.
    FoundLegacyColumnsInModernTable,
    /// Only the legacy table name matched.
    LegacyTableFallback,
    /// Only the modern table name matched.
    ModernTableFallback,
    /// Neither conversation table exists.
    NoTablesFound,
}

impl DetectionReason {
    /// Stable snake_case code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FoundProfileAndLegacyTable => "found_profile_and_legacy_table",
            Self::FoundLegacyTable => "found_legacy_table",
            Self::FoundModernColumns => "found_modern_columns",
            Self::FoundLegacyColumnsInModernTable => "found_legacy_columns_in_modern_table",
            Self::LegacyTableFallback => "legacy_table_fallback",
            Self::ModernTableFallback => "modern_table_fallback",
            Self::NoTablesFound => "no_tables_found",
        }
    }
}

impl fmt::Display for DetectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detected variant together with the rule that selected it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaDetection {
    /// Selected layout.
    pub variant: SchemaVariant,
    /// Rule that matched.
    pub reason: DetectionReason,
}

impl SchemaDetection {
    const fn new(variant: SchemaVariant, reason: DetectionReason) -> Self {
        Self { variant, reason }
    }
}

/// Column set of a probed table; `None` when the table is absent or the probe
/// failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableShape(Option<Vec<String>>);

impl TableShape {
    /// A table that does not exist (or could not be probed).
    pub fn absent() -> Self {
        Self(None)
    }

    /// A table that exists with the given columns.
    pub fn present<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(Some(columns.into_iter().map(Into::into).collect()))
    }

    /// Whether the table exists.
    pub fn exists(&self) -> bool {
        self.0.is_some()
    }

    /// Whether the table exists and carries every named column.
    ///
    /// Column names are matched exactly; quoted PascalCase identifiers are
    /// case-sensitive in PostgreSQL.
    pub fn has_columns(&self, required: &[&str]) -> bool {
        self.0.as_ref().is_some_and(|columns| {
            required
                .iter()
                .all(|name| columns.iter().any(|column| column == name))
        })
    }
}

/// User-independent facts about the conversation tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationTables {
    /// Shape of `"Conversation"`.
    pub legacy: TableShape,
    /// Shape of `conversations`.
    pub modern: TableShape,
}

/// All facts gathered for one detection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaProbeReport {
    /// Whether the requesting user has a legacy profile row.
    pub has_profile: bool,
    /// Conversation table shapes.
    pub tables: ConversationTables,
}

impl SchemaProbeReport {
    /// Apply the precedence table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arrienda_backend::domain::{
    ///     ConversationTables, DetectionReason, SchemaProbeReport, SchemaVariant, TableShape,
    /// };
    ///
    /// let report = SchemaProbeReport {
    ///     has_profile: false,
    ///     tables: ConversationTables {
    ///         legacy: TableShape::absent(),
    ///         modern: TableShape::present(["id", "sender_id", "receiver_id"]),
    ///     },
    /// };
    /// let detection = report.decide();
    /// assert_eq!(detection.variant, SchemaVariant::Supabase);
    /// assert_eq!(detection.reason, DetectionReason::FoundModernColumns);
    /// ```
    pub fn decide(&self) -> SchemaDetection {
        use DetectionReason as R;
        use LegacyLayout::{PascalCase, SnakeCase};

        let legacy = &self.tables.legacy;
        let modern = &self.tables.modern;
        let legacy_columns = legacy.has_columns(&LEGACY_PARTICIPANT_COLUMNS);

        if self.has_profile && legacy_columns {
            SchemaDetection::new(SchemaVariant::Prisma(PascalCase), R::FoundProfileAndLegacyTable)
        } else if legacy_columns {
            SchemaDetection::new(SchemaVariant::Prisma(PascalCase), R::FoundLegacyTable)
        } else if modern.has_columns(&MODERN_PARTICIPANT_COLUMNS) {
            SchemaDetection::new(SchemaVariant::Supabase, R::FoundModernColumns)
        } else if modern.has_columns(&SNAKE_LEGACY_PARTICIPANT_COLUMNS) {
            SchemaDetection::new(
                SchemaVariant::Prisma(SnakeCase),
                R::FoundLegacyColumnsInModernTable,
            )
        } else if legacy.exists() {
            SchemaDetection::new(SchemaVariant::Prisma(PascalCase), R::LegacyTableFallback)
        } else if modern.exists() {
            SchemaDetection::new(SchemaVariant::Prisma(SnakeCase), R::ModernTableFallback)
        } else {
            SchemaDetection::new(SchemaVariant::None, R::NoTablesFound)
        }
    }
}
