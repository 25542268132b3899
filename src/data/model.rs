use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a score table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the scalars a JSON row can hold.
/// Distinct values are collected into `BTreeSet`s, so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

static NULL: CellValue = CellValue::Null;

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    /// Nulls first, then booleans, then numbers (integers and floats
    /// interleaved numerically), then strings.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        use CellValue::*;
        fn rank(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) | Float(_) => 2,
                String(_) => 3,
            }
        }
        let ra = rank(self);
        let rb = rank(other);
        if ra != rb {
            return ra.cmp(&rb);
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            // Mixed numbers: numeric order, integer first on a tie so that
            // Ord stays consistent with the derived PartialEq.
            (Integer(a), Float(b)) => (*a as f64).total_cmp(b).then(Ordering::Less),
            (Float(a), Integer(b)) => a.total_cmp(&(*b as f64)).then(Ordering::Greater),
            (String(a), String(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Nulls display as an empty string so missing cells render blank.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Integral floats become integers (`1.0` → `1`, `-0.0` → `0`) so that
    /// equal numbers have one representation.
    pub fn normalized(self) -> CellValue {
        match self {
            CellValue::Float(v)
                if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 =>
            {
                CellValue::Integer(v as i64)
            }
            other => other,
        }
    }

    /// Numeric coercion used by loose equality: numbers as-is, booleans as
    /// 1/0, strings parsed in full (blank strings are 0), null has none.
    fn to_number(&self) -> Option<f64> {
        match self {
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Float(v) => Some(*v),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::String(s) => {
                let t = s.trim();
                if t.is_empty() {
                    Some(0.0)
                } else {
                    t.parse::<f64>().ok().filter(|v| v.is_finite())
                }
            }
            CellValue::Null => None,
        }
    }

    /// Equality without strict type distinction: `500 == "500"`,
    /// `430 == 430.0`. Null only equals null. Strings compare as text.
    pub fn loose_eq(&self, other: &CellValue) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Null, _) | (_, CellValue::Null) => false,
            (CellValue::String(a), CellValue::String(b)) => a == b,
            (a, b) => match (a.to_number(), b.to_number()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }

    /// Interpret the cell as a score the way a lenient float parser does:
    /// numbers as-is, strings by their leading numeric prefix (`"430分"` is
    /// 430). Returns `None` when nothing numeric can be read.
    pub fn parse_score(&self) -> Option<f64> {
        match self {
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Float(v) => Some(*v),
            CellValue::String(s) => parse_float_prefix(s),
            CellValue::Bool(_) | CellValue::Null => None,
        }
    }
}

/// Parse the longest leading decimal literal of `s` (after leading
/// whitespace). `"  12.5e1x"` is 125, `".5"` is 0.5, `"abc"` is `None`.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let t = s.trim_start();
    let bytes = t.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    if t[end..].starts_with("Infinity") {
        let neg = bytes.first() == Some(&b'-');
        return Some(if neg { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    t[..end].parse::<f64>().ok()
}

// ---------------------------------------------------------------------------
// Row / Dataset
// ---------------------------------------------------------------------------

/// One record of a year's table: column_name → value. Keys may be missing.
pub type Row = BTreeMap<String, CellValue>;

/// All rows for one year plus the authoritative column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Ordered list of column names; exactly the rendered headers.
    pub columns: Vec<String>,
    /// All rows, in file order.
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Dataset { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column` in row `idx`; absent keys read as null.
    pub fn cell(&self, idx: usize, column: &str) -> &CellValue {
        self.rows
            .get(idx)
            .and_then(|row| row.get(column))
            .unwrap_or(&NULL)
    }

    /// Sorted set of non-null values present in `column`. Numbers are
    /// deduplicated by value, so `1` and `1.0` yield a single entry.
    pub fn distinct_values(&self, column: &str) -> BTreeSet<CellValue> {
        self.rows
            .iter()
            .filter_map(|row| row.get(column))
            .filter(|v| !v.is_null())
            .map(|v| v.clone().normalized())
            .collect()
    }
}
