use std::fmt;

use nom::{
    branch::alt,
    character::complete::{char, multispace0, multispace1, u32 as parse_u32},
    combinator::{all_consuming, map, recognize},
    multi::separated_list1,
    sequence::{delimited, separated_pair, tuple},
    IResult,
};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::fragment::Fragment;

pub const PRIMER_PRODUCT_SIZE_RANGE: &str = "PRIMER_PRODUCT_SIZE_RANGE";
pub const PRIMER_NUM_RETURN: &str = "PRIMER_NUM_RETURN";

/// An amplicon size window, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange(pub u32, pub u32);

impl SizeRange {
    pub fn min(&self) -> u32 {
        self.0
    }

    pub fn max(&self) -> u32 {
        self.1
    }
}

impl fmt::Display for SizeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}

/// A single design parameter. The variant fixes how overrides are coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Ranges(Vec<SizeRange>),
}

impl ParamValue {
    fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Int(_) => "an integer",
            ParamValue::Float(_) => "a number",
            ParamValue::Ranges(_) => "size ranges such as '100-300 400-600'",
        }
    }

    /// Parse `raw` into a value of the same variant as `self`.
    pub fn coerce(&self, key: &str, raw: &str) -> Result<ParamValue, CoreError> {
        let raw = raw.trim();
        let invalid = || CoreError::InvalidParameterValue {
            key: key.to_string(),
            value: raw.to_string(),
            expected: self.type_name(),
        };
        match self {
            ParamValue::Int(_) => raw.parse::<i64>().map(ParamValue::Int).map_err(|_| invalid()),
            ParamValue::Float(_) => match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(ParamValue::Float(v)),
                _ => Err(invalid()),
            },
            ParamValue::Ranges(_) => parse_size_ranges(raw).map(ParamValue::Ranges).ok_or_else(invalid),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{:?}", v),
            ParamValue::Ranges(ranges) => {
                let parts: Vec<String> = ranges.iter().map(SizeRange::to_string).collect();
                write!(f, "{}", parts.join(" "))
            }
        }
    }
}

fn size_range(input: &str) -> IResult<&str, SizeRange> {
    map(
        separated_pair(parse_u32, char('-'), parse_u32),
        |(min, max)| SizeRange(min, max),
    )(input)
}

fn range_separator(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(tuple((multispace0, char(','), multispace0))),
        multispace1,
    ))(input)
}

/// Parse primer3-style size ranges: `min-max` pairs separated by whitespace or commas.
pub fn parse_size_ranges(input: &str) -> Option<Vec<SizeRange>> {
    all_consuming(delimited(
        multispace0,
        separated_list1(range_separator, size_range),
        multispace0,
    ))(input)
    .ok()
    .map(|(_, ranges)| ranges)
}

/// Named design constraints handed to the primer engine, in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignParameters {
    entries: Vec<(String, ParamValue)>,
}

impl DesignParameters {
    /// The baseline parameter set for one design run.
    pub fn defaults(min_amplicon: u32, max_amplicon: u32, num_primers: usize) -> Self {
        use ParamValue::{Float, Int, Ranges};

        let entries = vec![
            ("PRIMER_OPT_SIZE", Int(20)),
            ("PRIMER_PICK_INTERNAL_OLIGO", Int(1)),
            ("PRIMER_INTERNAL_MAX_SELF_END", Int(8)),
            ("PRIMER_MIN_SIZE", Int(18)),
            ("PRIMER_MAX_SIZE", Int(25)),
            ("PRIMER_OPT_TM", Float(52.0)),
            ("PRIMER_MIN_TM", Float(48.0)),
            ("PRIMER_MAX_TM", Float(56.0)),
            ("PRIMER_MIN_GC", Float(20.0)),
            ("PRIMER_MAX_GC", Float(80.0)),
            ("PRIMER_MAX_POLY_X", Int(100)),
            ("PRIMER_INTERNAL_MAX_POLY_X", Int(100)),
            ("PRIMER_SALT_MONOVALENT", Float(50.0)),
            ("PRIMER_DNA_CONC", Float(50.0)),
            ("PRIMER_MAX_NS_ACCEPTED", Int(0)),
            ("PRIMER_MAX_SELF_ANY", Int(12)),
            ("PRIMER_MAX_SELF_END", Int(8)),
            ("PRIMER_PAIR_MAX_COMPL_ANY", Int(12)),
            ("PRIMER_PAIR_MAX_COMPL_END", Int(8)),
            (
                PRIMER_PRODUCT_SIZE_RANGE,
                Ranges(vec![SizeRange(min_amplicon, max_amplicon)]),
            ),
            (PRIMER_NUM_RETURN, Int(num_primers as i64)),
        ];

        Self {
            entries: entries
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace an existing parameter, coercing `raw` to the current value's type.
    ///
    /// On error nothing is changed.
    pub fn override_value(&mut self, key: &str, raw: &str) -> Result<&ParamValue, CoreError> {
        let slot = self
            .entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .ok_or_else(|| CoreError::UnknownParameter(key.to_string()))?;
        *slot = slot.coerce(key, raw)?;
        Ok(&*slot)
    }

    /// Apply several overrides in order, stopping at the first rejected one.
    pub fn apply_overrides<'a, I>(&mut self, overrides: I) -> Result<(), CoreError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, raw) in overrides {
            self.override_value(key, raw)?;
        }
        Ok(())
    }

    pub fn product_size_ranges(&self) -> &[SizeRange] {
        match self.get(PRIMER_PRODUCT_SIZE_RANGE) {
            Some(ParamValue::Ranges(ranges)) => ranges,
            _ => &[],
        }
    }

    /// Number of pairs requested per fragment.
    pub fn num_return(&self) -> usize {
        match self.get(PRIMER_NUM_RETURN) {
            Some(ParamValue::Int(n)) if *n > 0 => *n as usize,
            _ => 0,
        }
    }

    /// Check the amplicon ranges and return count against the planned fragments.
    pub fn validate_for(&self, fragments: &[Fragment]) -> Result<(), CoreError> {
        if self.num_return() == 0 {
            return Err(CoreError::InvalidParameterValue {
                key: PRIMER_NUM_RETURN.to_string(),
                value: self
                    .get(PRIMER_NUM_RETURN)
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                expected: "a positive integer",
            });
        }

        let ranges = self.product_size_ranges();
        if ranges.is_empty() {
            return Err(CoreError::UnknownParameter(
                PRIMER_PRODUCT_SIZE_RANGE.to_string(),
            ));
        }
        let smallest = fragments.iter().map(|f| f.length).min();

        for range in ranges {
            validate_amplicon_range(range.min(), range.max(), smallest)?;
        }
        Ok(())
    }
}

/// Check one amplicon window; `smallest_fragment` is the length of the shortest fragment.
pub fn validate_amplicon_range(
    min: u32,
    max: u32,
    smallest_fragment: Option<usize>,
) -> Result<(), CoreError> {
    if min == 0 {
        return Err(CoreError::AmpliconRange {
            min,
            max,
            reason: "sizes must be positive".to_string(),
        });
    }
    if min > max {
        return Err(CoreError::AmpliconRange {
            min,
            max,
            reason: "min must not exceed max".to_string(),
        });
    }
    if let Some(smallest) = smallest_fragment {
        if max as usize > smallest {
            return Err(CoreError::AmpliconRange {
                min,
                max,
                reason: format!(
                    "max amplicon size cannot be greater than the length of the smallest fragment ({})",
                    smallest
                ),
            });
        }
    }
    Ok(())
}
