//! Column schema and per-row cell storage for a query result.

/// Presto column type as reported in `columns[].type`.
///
/// Unrecognized type strings map to [`FieldType::Varchar`] rather than an
/// error, matching the wire contract: the server may introduce new type
/// names and clients must keep working against the textual cell value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldType {
    #[default]
    Undefined,
    Varchar,
    Bigint,
    Boolean,
    Double,
    Date,
    Time,
    TimeWithTimeZone,
    Timestamp,
    TimestampWithTimeZone,
    IntervalYearToMonth,
    IntervalDayToSecond,
}

impl FieldType {
    /// Maps a Presto `columns[].type` string to the type enum.
    ///
    /// Equality is literal, per §4.D: no case-folding, no partial matches.
    pub fn from_wire(type_name: &str) -> Self {
        match type_name {
            "bigint" => Self::Bigint,
            "boolean" => Self::Boolean,
            "double" => Self::Double,
            "date" => Self::Date,
            "time" => Self::Time,
            "time with time zone" => Self::TimeWithTimeZone,
            "timestamp" => Self::Timestamp,
            "timestamp with time zone" => Self::TimestampWithTimeZone,
            "interval year to month" => Self::IntervalYearToMonth,
            "interval day to second" => Self::IntervalDayToSecond,
            _ => Self::Varchar,
        }
    }

    /// The `PRESTO_`-prefixed literal reported by the type-name accessor.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Undefined => "PRESTO_UNDEFINED",
            Self::Varchar => "PRESTO_VARCHAR",
            Self::Bigint => "PRESTO_BIGINT",
            Self::Boolean => "PRESTO_BOOLEAN",
            Self::Double => "PRESTO_DOUBLE",
            Self::Date => "PRESTO_DATE",
            Self::Time => "PRESTO_TIME",
            Self::TimeWithTimeZone => "PRESTO_TIME_WITH_TIME_ZONE",
            Self::Timestamp => "PRESTO_TIMESTAMP",
            Self::TimestampWithTimeZone => "PRESTO_TIMESTAMP_WITH_TIME_ZONE",
            Self::IntervalYearToMonth => "PRESTO_INTERVAL_YEAR_TO_MONTH",
            Self::IntervalDayToSecond => "PRESTO_INTERVAL_DAY_TO_SECOND",
        }
    }
}

/// A single column of a result: its schema plus whatever cell the current
/// row holds for it.
///
/// Created once `columns[i].name` is seen and never destroyed until the
/// owning [`QueryResult`](crate::result::QueryResult) is dropped; the
/// column vector itself is append-only during discovery and frozen once
/// the first row is delivered (invariant 3, §3).
#[derive(Debug, Clone, Default)]
pub struct Column {
    pub name: String,
    pub field_type: FieldType,
    pub(crate) cell_text: String,
    pub(crate) cell_is_null: bool,
}

impl Column {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            field_type: FieldType::Undefined,
            cell_text: String::new(),
            cell_is_null: false,
        }
    }

    /// Current cell's textual form. Rows are delivered as text; no type
    /// conversion is performed (non-goal, §1).
    pub fn cell_text(&self) -> &str {
        &self.cell_text
    }

    /// Whether the current cell's server-side value was JSON `null`.
    pub fn cell_is_null(&self) -> bool {
        self.cell_is_null
    }
}
