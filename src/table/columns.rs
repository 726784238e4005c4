//! Column names shared with the plotting and dataset layers
//!
//! These names are part of the output contract: the plotting collaborator
//! looks columns up by exactly these strings.

/// Measured depth
pub const DEPTH: &str = "DEPTH";
/// Well identifier in multi-well datasets
pub const WELL_NAME: &str = "WELL_NAME";
/// Stratigraphic marker name
pub const MARKER: &str = "MARKER";

/// Gamma ray
pub const GR: &str = "GR";
/// True formation resistivity
pub const RT: &str = "RT";
/// Neutron porosity
pub const NPHI: &str = "NPHI";
/// Bulk density
pub const RHOB: &str = "RHOB";

/// Shale volume used by downstream pipelines
pub const VSH: &str = "VSH";
/// Shale volume from gamma ray
pub const VSH_GR: &str = "VSH_GR";
/// Legacy name for the linear gamma-ray shale volume
pub const VSH_LINEAR: &str = "VSH_LINEAR";
/// Shale volume from the density-neutron crossplot
pub const VSH_DN: &str = "VSH_DN";
/// `VSH_GR - VSH_DN`
pub const VSH_DIFF: &str = "VSH_DIFF";
/// Effective porosity
pub const PHIE: &str = "PHIE";

/// Water saturation
pub const SW: &str = "SW";
/// Water resistivity at formation temperature
pub const RW_TEMP: &str = "RW_TEMP";
/// Apparent water resistivity, full Indonesia
pub const RWA_FULL: &str = "RWA_FULL";
/// Apparent water resistivity, simple Indonesia
pub const RWA_SIMPLE: &str = "RWA_SIMPLE";
/// Apparent water resistivity, tar sand
pub const RWA_TAR: &str = "RWA_TAR";

/// Reservoir-quality flag
pub const IQUAL: &str = "IQUAL";
/// Zone group id
pub const GROUP_ID: &str = "GROUP_ID";
/// GR-RT regression slope (x100)
pub const RGBE: &str = "RGBE";
/// GR-RT correlation coefficient
pub const R_RGBE: &str = "R_RGBE";
/// PHIE-RT regression slope
pub const RPBE: &str = "RPBE";
/// PHIE-RT correlation coefficient
pub const R_RPBE: &str = "R_RPBE";

/// Archie apparent water resistivity (`RT * PHIE^M`)
pub const RWA: &str = "RWA";
/// Wet resistivity
pub const R0: &str = "R0";
/// `RT - R0`
pub const RTR0: &str = "RTR0";
/// RT-R0 regression slope
pub const RT_R0_GRAD: &str = "RT_R0_GRAD";
/// PHIE-RTR0 regression slope
pub const PHIE_RTR0_GRAD: &str = "PHIE_RTR0_GRAD";
/// Fluid label from the PHIE-RTR0 slope
pub const FLUID_RTROPHIE: &str = "FLUID_RTROPHIE";

/// Formation conductivity (`1 / RT`)
pub const CT: &str = "CT";
/// Formation temperature (F)
pub const FTEMP: &str = "FTEMP";
/// Saturation gradient against salinity
pub const SWGRAD: &str = "SWGRAD";

/// Density-neutron separation
pub const DNS: &str = "DNS";
/// Shale-corrected density-neutron separation
pub const DNSV: &str = "DNSV";

/// Smoothed resistivity
pub const RGSA: &str = "RGSA";
/// Smoothed neutron porosity
pub const NGSA: &str = "NGSA";
/// Smoothed bulk density
pub const DGSA: &str = "DGSA";

/// Name of the `index`-th salinity sweep column (`SWARRAY_1` ..= `SWARRAY_25`)
#[must_use]
pub fn swarray(index: usize) -> String {
    format!("SWARRAY_{index}")
}
