use chrono::{DateTime, Utc};

/// Irradiance component selector, used to drive per-component panels and
/// statistics without repeating field access three times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Ghi,
    Dhi,
    Dni,
}

impl Component {
    pub const ALL: [Component; 3] = [Component::Ghi, Component::Dhi, Component::Dni];

    pub fn label(&self) -> &'static str {
        match self {
            Component::Ghi => "GHI",
            Component::Dhi => "DHI",
            Component::Dni => "DNI",
        }
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One inner-joined ground + model observation at a shared UTC timestamp,
/// after QC filtering and unit conversion. All six component values are
/// finite by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonRecord {
    pub time: DateTime<Utc>,
    pub ghi_ground: f64,
    pub dhi_ground: f64,
    pub dni_ground: f64,
    pub ghi_cams: f64,
    pub dhi_cams: f64,
    pub dni_cams: f64,
    pub cloud_cover: Option<f64>,
}

impl ComparisonRecord {
    pub fn ground(&self, component: Component) -> f64 {
        match component {
            Component::Ghi => self.ghi_ground,
            Component::Dhi => self.dhi_ground,
            Component::Dni => self.dni_ground,
        }
    }

    pub fn model(&self, component: Component) -> f64 {
        match component {
            Component::Ghi => self.ghi_cams,
            Component::Dhi => self.dhi_cams,
            Component::Dni => self.dni_cams,
        }
    }

    /// Model minus ground for one component.
    pub fn bias(&self, component: Component) -> f64 {
        self.model(component) - self.ground(component)
    }

    /// Ground GHI over ground DHI. A DHI of exactly zero has no defined
    /// ratio, never an infinity.
    pub fn ghi_dhi_ratio(&self) -> Option<f64> {
        if self.dhi_ground == 0.0 {
            None
        } else {
            Some(self.ghi_ground / self.dhi_ground)
        }
    }
}
