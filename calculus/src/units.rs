//! Minimal physical-unit algebra: products of base symbols with integer
//! exponents plus a scale factor to the canonical unit.
//!
//! Angles are dimensionless (a radian is `1`); the angular flag only
//! survives while a unit is a bare angle, which is what gives degrees and
//! radians their modulus for periodic axes.

use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt;
use std::ops::{Div, Mul};
use std::str::FromStr;

use crate::errors::{CalculusError, Result};

const SCALE_TOL: f64 = 1e-12;

#[derive(Clone, Debug)]
pub struct Unit {
    scale: f64,
    terms: BTreeMap<String, i32>,
    angle: bool,
    label: Option<String>,
}

/// `(symbol, scale, base)`; an empty base marks a dimensionless symbol.
const SYMBOLS: &[(&str, f64, &str)] = &[
    ("m", 1.0, "m"),
    ("metre", 1.0, "m"),
    ("meter", 1.0, "m"),
    ("km", 1000.0, "m"),
    ("cm", 0.01, "m"),
    ("mm", 0.001, "m"),
    ("s", 1.0, "s"),
    ("second", 1.0, "s"),
    ("min", 60.0, "s"),
    ("h", 3600.0, "s"),
    ("hour", 3600.0, "s"),
    ("day", 86_400.0, "s"),
    ("K", 1.0, "K"),
    ("kg", 1.0, "kg"),
    ("g", 0.001, "kg"),
    ("Pa", 1.0, "Pa"),
    ("hPa", 100.0, "Pa"),
];

const ANGLES: &[(&str, f64)] = &[
    ("radians", 1.0),
    ("radian", 1.0),
    ("rad", 1.0),
    ("degrees", PI / 180.0),
    ("degree", PI / 180.0),
    ("deg", PI / 180.0),
    ("degrees_east", PI / 180.0),
    ("degrees_north", PI / 180.0),
];

impl Unit {
    /// The dimensionless unit `1`.
    pub fn one() -> Self {
        Self {
            scale: 1.0,
            terms: BTreeMap::new(),
            angle: false,
            label: None,
        }
    }

    pub fn radians() -> Self {
        Self {
            angle: true,
            ..Self::one()
        }
    }

    pub fn degrees() -> Self {
        Self {
            scale: PI / 180.0,
            angle: true,
            ..Self::one()
        }
    }

    /// Parse a unit string such as `"m s-1"`, `"m.s^-1"`, `"km/h"` or `"degrees"`.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if let Some((_, scale)) = ANGLES.iter().find(|(sym, _)| *sym == trimmed) {
            return Ok(Self {
                scale: *scale,
                angle: true,
                label: Some(trimmed.to_string()),
                ..Self::one()
            });
        }

        let mut parts = trimmed.splitn(2, '/');
        let numerator = parts.next().unwrap_or_default();
        let mut unit = Self::parse_product(numerator)?;
        if let Some(denominator) = parts.next() {
            unit = &unit / &Self::parse_product(denominator)?;
        }
        unit.label = Some(trimmed.to_string());
        Ok(unit)
    }

    fn parse_product(raw: &str) -> Result<Self> {
        let mut unit = Self::one();
        for token in raw
            .split(|c: char| c.is_whitespace() || c == '.' || c == '*')
            .filter(|t| !t.is_empty())
        {
            if token == "1" {
                continue;
            }
            let split = token
                .find(|c: char| c.is_ascii_digit() || c == '-' || c == '+' || c == '^')
                .unwrap_or(token.len());
            let (symbol, exp) = token.split_at(split);
            let exp = exp.trim_start_matches('^');
            let exponent: i32 = if exp.is_empty() {
                1
            } else {
                exp.parse().map_err(|_| {
                    CalculusError::UnitConversion(format!("bad exponent in unit token '{token}'"))
                })?
            };
            let factor = Self::symbol(symbol)?;
            unit = &unit * &factor.powi(exponent);
        }
        Ok(unit)
    }

    fn symbol(symbol: &str) -> Result<Self> {
        if let Some((_, scale)) = ANGLES.iter().find(|(sym, _)| *sym == symbol) {
            return Ok(Self {
                scale: *scale,
                ..Self::one()
            });
        }
        let (_, scale, base) = SYMBOLS
            .iter()
            .find(|(sym, _, _)| *sym == symbol)
            .ok_or_else(|| {
                CalculusError::UnitConversion(format!("unknown unit symbol '{symbol}'"))
            })?;
        let mut terms = BTreeMap::new();
        terms.insert((*base).to_string(), 1);
        Ok(Self {
            scale: *scale,
            terms,
            angle: false,
            label: None,
        })
    }

    fn powi(&self, exponent: i32) -> Self {
        Self {
            scale: self.scale.powi(exponent),
            terms: self
                .terms
                .iter()
                .map(|(base, e)| (base.clone(), e * exponent))
                .collect(),
            angle: self.angle && exponent == 1,
            label: None,
        }
    }

    pub fn is_dimensionless(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn is_angle(&self) -> bool {
        self.angle
    }

    /// Period of an angular unit: 360 for degrees, 2π for radians.
    pub fn modulus(&self) -> Option<f64> {
        self.angle.then(|| 2.0 * PI / self.scale)
    }

    /// Multiplier taking a value in `self` to a value in `to`.
    pub fn conversion_factor(&self, to: &Unit) -> Result<f64> {
        if self.terms != to.terms {
            return Err(CalculusError::UnitConversion(format!(
                "cannot convert from '{self}' to '{to}'"
            )));
        }
        Ok(self.scale / to.scale)
    }

    pub fn convert(&self, value: f64, to: &Unit) -> Result<f64> {
        Ok(value * self.conversion_factor(to)?)
    }

    fn combine(&self, rhs: &Unit, sign: i32) -> Unit {
        let mut terms = self.terms.clone();
        for (base, e) in &rhs.terms {
            let entry = terms.entry(base.clone()).or_insert(0);
            *entry += sign * e;
            if *entry == 0 {
                terms.remove(base);
            }
        }
        let scale = if sign > 0 {
            self.scale * rhs.scale
        } else {
            self.scale / rhs.scale
        };
        let plain = |u: &Unit| !u.angle && u.terms.is_empty() && (u.scale - 1.0).abs() < SCALE_TOL;
        let angle = (self.angle && plain(rhs)) || (sign > 0 && rhs.angle && plain(self));
        Unit {
            scale,
            terms,
            angle,
            label: None,
        }
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.terms == other.terms
            && self.angle == other.angle
            && (self.scale - other.scale).abs() <= SCALE_TOL * self.scale.abs().max(1.0)
    }
}

impl Default for Unit {
    fn default() -> Self {
        Self::one()
    }
}

impl FromStr for Unit {
    type Err = CalculusError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Mul for &Unit {
    type Output = Unit;

    fn mul(self, rhs: &Unit) -> Unit {
        self.combine(rhs, 1)
    }
}

impl Div for &Unit {
    type Output = Unit;

    fn div(self, rhs: &Unit) -> Unit {
        self.combine(rhs, -1)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = &self.label {
            return f.write_str(label);
        }
        if self.angle {
            if (self.scale - 1.0).abs() < SCALE_TOL {
                return f.write_str("radians");
            }
            if (self.scale - PI / 180.0).abs() < SCALE_TOL {
                return f.write_str("degrees");
            }
        }
        let mut parts = Vec::new();
        if (self.scale - 1.0).abs() >= SCALE_TOL || self.terms.is_empty() {
            parts.push(format!("{}", self.scale));
        }
        for (base, e) in &self.terms {
            if *e == 1 {
                parts.push(base.clone());
            } else {
                parts.push(format!("{base}{e}"));
            }
        }
        f.write_str(&parts.join(" "))
    }
}
