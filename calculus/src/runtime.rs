use crate::{
    config::CalculusConfig,
    cube::Cube,
    curl::{curl_with, CurlComponents},
    differential::{delta_cube, derivative, CoordRef},
    errors::Result,
    regrid::{LinearRegridder, Regridder},
};

pub trait CubeCalculus {
    fn cube_delta(&self, cube: &Cube, coord: CoordRef<'_>) -> Result<Cube>;
    fn differentiate(&self, cube: &Cube, coord: CoordRef<'_>) -> Result<Cube>;
    fn curl(&self, i: &Cube, j: &Cube, k: Option<&Cube>) -> Result<CurlComponents>;
}

/// Calculus operations bound to a configuration and a regridding strategy.
pub struct Calculus {
    cfg: CalculusConfig,
    regridder: Box<dyn Regridder>,
}

impl Default for Calculus {
    fn default() -> Self {
        Self::with_config(CalculusConfig::default())
    }
}

impl Calculus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(cfg: CalculusConfig) -> Self {
        let regridder = LinearRegridder {
            tolerance: cfg.comparison_tolerance,
        };
        Self {
            cfg,
            regridder: Box::new(regridder),
        }
    }

    /// Swap the strategy used to align curl derivatives onto a common grid.
    pub fn with_regridder(mut self, regridder: impl Regridder + 'static) -> Self {
        self.regridder = Box::new(regridder);
        self
    }

    pub fn config(&self) -> &CalculusConfig {
        &self.cfg
    }

    /// Curl with the deprecated `ignore` list, which only triggers a warning.
    pub fn curl_ignoring(
        &self,
        i: &Cube,
        j: &Cube,
        k: Option<&Cube>,
        ignore: Option<&[&str]>,
    ) -> Result<CurlComponents> {
        curl_with(i, j, k, ignore, &self.cfg, self.regridder.as_ref())
    }
}

impl CubeCalculus for Calculus {
    fn cube_delta(&self, cube: &Cube, coord: CoordRef<'_>) -> Result<Cube> {
        let coord = coord.resolve(cube)?;
        delta_cube(cube, &coord, self.cfg.update_history)
    }

    fn differentiate(&self, cube: &Cube, coord: CoordRef<'_>) -> Result<Cube> {
        let coord = coord.resolve(cube)?;
        derivative(cube, &coord, self.cfg.update_history)
    }

    fn curl(&self, i: &Cube, j: &Cube, k: Option<&Cube>) -> Result<CurlComponents> {
        self.curl_ignoring(i, j, k, None)
    }
}

/// Curl with the default configuration and linear regridding.
///
/// `update_history` overrides the configured default for this call.
pub fn curl(
    i: &Cube,
    j: &Cube,
    k: Option<&Cube>,
    ignore: Option<&[&str]>,
    update_history: bool,
) -> Result<CurlComponents> {
    let calculus = Calculus::with_config(CalculusConfig {
        update_history,
        ..CalculusConfig::default()
    });
    calculus.curl_ignoring(i, j, k, ignore)
}
