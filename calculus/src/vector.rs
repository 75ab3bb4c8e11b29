//! Recognising vector components from cube names such as `"u wind"`.

use std::sync::OnceLock;

use regex::Regex;

use crate::cube::Cube;
use crate::errors::{CalculusError, Result};

/// Recognised direction triples. When several match, the last one wins.
pub const DIRECTION_TRIPLES: [[&str; 3]; 6] = [
    ["u", "v", "w"],
    ["x", "y", "z"],
    ["i", "j", "k"],
    ["eastward", "northward", "upward"],
    ["easterly", "northerly", "vertical"],
    ["easterly", "northerly", "radial"],
];

static VECTOR_QUANTITY: OnceLock<Regex> = OnceLock::new();

fn vector_quantity() -> &'static Regex {
    VECTOR_QUANTITY.get_or_init(|| {
        Regex::new(r"^([^\W_]+)[\W_]+(.*)$").expect("vector quantity regex must compile")
    })
}

/// Split `"u wind"` into `("u", "wind")`.
pub fn split_vector_name(name: &str) -> Result<(&str, &str)> {
    let caps = vector_quantity().captures(name).ok_or_else(|| {
        CalculusError::naming(format!("'{name}' is not of the form '<direction> <phenomenon>'"))
    })?;
    match (caps.get(1), caps.get(2)) {
        (Some(direction), Some(phenomenon)) => Ok((direction.as_str(), phenomenon.as_str())),
        _ => Err(CalculusError::naming(format!("could not split '{name}'"))),
    }
}

/// Direction triple and shared phenomenon named by two or three component cubes.
///
/// `"u wind"` and `"v wind"` give `(["u", "v", "w"], "wind")`.
pub fn spatial_vectors_with_phenom_name(
    i: &Cube,
    j: &Cube,
    k: Option<&Cube>,
) -> Result<([&'static str; 3], String)> {
    let names: Vec<&str> = [Some(i), Some(j), k]
        .into_iter()
        .flatten()
        .map(Cube::name)
        .collect();
    let parts = names
        .iter()
        .map(|name| split_vector_name(name))
        .collect::<Result<Vec<_>>>()?;
    let (directions, phenomena): (Vec<&str>, Vec<&str>) = parts.into_iter().unzip();

    if phenomena.iter().any(|p| *p != phenomena[0]) {
        return Err(CalculusError::naming(format!(
            "vector phenomenon name not consistent between vector cubes. Got cube phenomena: {}; from standard names: {}",
            phenomena.join(", "),
            names.join(", ")
        )));
    }

    let matched = DIRECTION_TRIPLES
        .iter()
        .rev()
        .find(|triple| triple[..directions.len()] == directions[..]);
    match matched {
        Some(triple) => Ok((*triple, phenomena[0].to_string())),
        None => {
            let known = DIRECTION_TRIPLES
                .iter()
                .map(|t| t.join(", "))
                .collect::<Vec<_>>()
                .join("; ");
            Err(CalculusError::naming(format!(
                "({}) are not recognised vector directions. Possible directions are: {known}",
                directions.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::ArrayD;

    use super::*;
    use crate::units::Unit;

    fn named(name: &str) -> Cube {
        Cube::new(ArrayD::zeros(vec![1]), name, Unit::one())
    }

    #[test]
    fn splits_on_separator_runs() {
        assert_eq!(split_vector_name("u wind").unwrap(), ("u", "wind"));
        assert_eq!(
            split_vector_name("eastward_sea_water_velocity").unwrap(),
            ("eastward", "sea_water_velocity")
        );
        assert_eq!(split_vector_name("x - component").unwrap(), ("x", "component"));
        assert!(split_vector_name("wind").is_err());
        assert!(split_vector_name("_u wind").is_err());
    }

    #[test]
    fn wind_components() {
        let (dirs, phenom) =
            spatial_vectors_with_phenom_name(&named("u wind"), &named("v wind"), None).unwrap();
        assert_eq!(dirs, ["u", "v", "w"]);
        assert_eq!(phenom, "wind");
        let (dirs, _) = spatial_vectors_with_phenom_name(
            &named("i flux"),
            &named("j flux"),
            Some(&named("k flux")),
        )
        .unwrap();
        assert_eq!(dirs, ["i", "j", "k"]);
    }

    #[test]
    fn last_matching_triple_wins() {
        let (dirs, _) = spatial_vectors_with_phenom_name(
            &named("easterly wind"),
            &named("northerly wind"),
            None,
        )
        .unwrap();
        assert_eq!(dirs, ["easterly", "northerly", "radial"]);
        let (dirs, _) = spatial_vectors_with_phenom_name(
            &named("easterly wind"),
            &named("northerly wind"),
            Some(&named("vertical wind")),
        )
        .unwrap();
        assert_eq!(dirs, ["easterly", "northerly", "vertical"]);
    }

    #[test]
    fn inconsistent_or_unknown_names_fail() {
        let err = spatial_vectors_with_phenom_name(&named("u wind"), &named("v temperature"), None)
            .unwrap_err();
        assert!(matches!(err, CalculusError::Naming(_)));
        let err = spatial_vectors_with_phenom_name(&named("a wind"), &named("b wind"), None)
            .unwrap_err();
        assert!(matches!(err, CalculusError::Naming(_)));
        let swapped = spatial_vectors_with_phenom_name(&named("v wind"), &named("u wind"), None);
        assert!(swapped.is_err());
    }
}
