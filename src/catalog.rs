//! Parameter form definitions
//!
//! Front ends render one form per calculation. Every field's default is read
//! back from the serialised `Default` of the calculation's parameter struct,
//! so a form submitted untouched parses to exactly those defaults.

use crate::pipeline::{
    dns_dnsv::DnsDnsvParams, gsa::GsaParams, normalization::NormalizationParams,
    porosity::PorosityParams, rgbe_rpbe::RgbeRpbeParams, rt_r0::RtR0Params, rwa::RwaParams,
    sw::SwParams, swgrad::SwgradParams, vsh::VshParams, vsh_dn::VshDnParams, Calculation,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Input widget kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    /// Floating-point number
    Float,
    /// Whole number
    Integer,
    /// Free text (log names)
    Text,
    /// One of `options`
    Select,
    /// Several of `options`
    Multiselect,
}

/// One form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    /// Key posted back in the parameter set
    pub name: String,
    /// Widget kind
    #[serde(rename = "type")]
    pub kind: ParameterKind,
    /// Value used when the field is left untouched
    pub default: Value,
    /// Human-readable label
    pub label: String,
    /// Lower bound, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Allowed values for select kinds
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub options: Vec<String>,
}

impl ParameterDefinition {
    fn new(name: &str, kind: ParameterKind, label: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            default: Value::Null,
            label: label.to_string(),
            min: None,
            max: None,
            options: Vec::new(),
        }
    }

    fn float(name: &str, label: &str) -> Self {
        Self::new(name, ParameterKind::Float, label)
    }

    fn text(name: &str, label: &str) -> Self {
        Self::new(name, ParameterKind::Text, label)
    }

    fn select(name: &str, label: &str, options: &[&str]) -> Self {
        let mut def = Self::new(name, ParameterKind::Select, label);
        def.options = options.iter().map(ToString::to_string).collect();
        def
    }

    fn range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    fn at_least(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }
}

/// A calculation's complete form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationForm {
    /// Calculation name as posted by front ends
    pub calculation: Calculation,
    /// Form title
    pub title: String,
    /// Fields in display order
    pub parameters: Vec<ParameterDefinition>,
}

impl CalculationForm {
    /// Parameter set holding every field's default
    #[must_use]
    pub fn default_params(&self) -> crate::ParamSet {
        self.parameters
            .iter()
            .fold(crate::ParamSet::new(), |set, p| set.with(p.name.clone(), p.default.clone()))
    }
}

fn defaults_of<T: Serialize + Default>() -> Result<Map<String, Value>> {
    match serde_json::to_value(T::default())? {
        Value::Object(map) => Ok(map),
        other => Err(Error::Other(format!(
            "parameter defaults must serialise to an object, got {other}"
        ))),
    }
}

fn fields(calculation: Calculation) -> (Result<Map<String, Value>>, Vec<ParameterDefinition>) {
    use ParameterDefinition as P;

    let archie = || {
        [
            P::float("A", "Tortuosity factor (a)").range(0.1, 10.0),
            P::float("M", "Cementation exponent (m)").range(1.0, 4.0),
            P::float("N", "Saturation exponent (n)").range(1.0, 4.0),
        ]
    };
    let cutoffs = || {
        [
            P::float("PHIE_CUTOFF", "Porosity cutoff").range(0.0, 1.0),
            P::float("VSH_CUTOFF", "Shale volume cutoff").range(0.0, 1.0),
        ]
    };

    match calculation {
        Calculation::Vsh => (
            defaults_of::<VshParams>(),
            vec![
                P::float("GR_MA", "GR clean sand (API)").at_least(0.0),
                P::float("GR_SH", "GR shale (API)").at_least(0.0),
                P::text("input_log", "Input log"),
                P::text("output_log", "Output log"),
            ],
        ),
        Calculation::VshDn => (
            defaults_of::<VshDnParams>(),
            vec![
                P::float("RHO_MA", "Matrix density (g/cc)").range(1.0, 3.5),
                P::float("RHO_SH", "Shale density (g/cc)").range(1.0, 3.5),
                P::float("RHO_FL", "Fluid density (g/cc)").range(0.0, 1.5),
                P::float("NPHI_MA", "Matrix neutron (v/v)").range(-0.15, 1.0),
                P::float("NPHI_SH", "Shale neutron (v/v)").range(-0.15, 1.0),
                P::float("NPHI_FL", "Fluid neutron (v/v)").range(-0.15, 1.5),
                P::text("RHOB", "Density log"),
                P::text("NPHI", "Neutron log"),
                P::text("VSH", "Output log"),
            ],
        ),
        Calculation::Porosity => (
            defaults_of::<PorosityParams>(),
            vec![
                P::select("PHIE_METHOD", "Method", &["density", "neutron", "combined"]),
                P::float("RHO_MA", "Matrix density (g/cc)").range(1.0, 3.5),
                P::float("RHO_FL", "Fluid density (g/cc)").range(0.0, 1.5),
                P::float("NPHI_MA", "Matrix neutron (v/v)").range(-0.15, 1.0),
                P::float("NPHI_FL", "Fluid neutron (v/v)").range(0.0, 1.5),
            ],
        ),
        Calculation::Gsa => (
            defaults_of::<GsaParams>(),
            vec![ParameterDefinition::new(
                "window_size",
                ParameterKind::Integer,
                "Window (samples)",
            )
            .range(1.0, 1000.0)],
        ),
        Calculation::Sw => {
            let mut fields = vec![
                P::select("SW_METHOD", "Method", &["simple", "full", "tar", "archie"]),
                P::float("RWS", "Water resistivity at surface (ohm.m)").at_least(0.0),
                P::float("RWT", "Temperature of RWS (°F)"),
                P::float("FTEMP", "Formation temperature (°F)"),
                P::float("RT_SH", "Shale resistivity (ohm.m)").at_least(0.0),
                P::float("RW", "Water resistivity, Archie (ohm.m)").at_least(0.0),
            ];
            fields.extend(archie());
            (defaults_of::<SwParams>(), fields)
        }
        Calculation::Rwa => (
            defaults_of::<RwaParams>(),
            vec![
                P::float("A", "Tortuosity factor (a)").range(0.1, 10.0),
                P::float("M", "Cementation exponent (m)").range(1.0, 4.0),
                P::float("RT_SH", "Shale resistivity (ohm.m)").at_least(0.0),
            ],
        ),
        Calculation::RgbeRpbe => (defaults_of::<RgbeRpbeParams>(), cutoffs().to_vec()),
        Calculation::RtR0 => {
            let mut fields = archie()[..2].to_vec();
            fields.push(P::float("RTSH", "Shale resistivity (ohm.m)").at_least(0.0));
            fields.push(P::float("RW", "Water resistivity (ohm.m)").at_least(0.0));
            fields.extend(cutoffs());
            (defaults_of::<RtR0Params>(), fields)
        }
        Calculation::Swgrad => {
            let mut fields = archie().to_vec();
            fields.push(P::float("RTSH", "Shale resistivity (ohm.m)").at_least(0.0));
            fields.push(P::float("SURFACE_TEMP", "Surface temperature (°F)"));
            fields.push(P::float("GEOTHERMAL_GRADIENT", "Geothermal gradient (°F/ft)"));
            fields.push(P::float("FTEMP", "Formation temperature override (°F)"));
            (defaults_of::<SwgradParams>(), fields)
        }
        Calculation::DnsDnsv => (
            defaults_of::<DnsDnsvParams>(),
            vec![
                P::float("RHOB_SH", "Shale density (g/cc)").range(1.0, 3.5),
                P::float("NPHI_SH", "Shale neutron (v/v)").range(-0.15, 1.0),
            ],
        ),
        Calculation::Normalization => (
            defaults_of::<NormalizationParams>(),
            vec![
                P::text("LOG_IN", "Input log"),
                P::text("LOG_OUT", "Output log"),
                ParameterDefinition::new("intervals", ParameterKind::Multiselect, "Intervals"),
            ],
        ),
    }
}

/// Form definition for one calculation
///
/// # Errors
///
/// A form field without a matching parameter default
pub fn parameter_definitions(calculation: Calculation) -> Result<CalculationForm> {
    let (defaults, mut parameters) = fields(calculation);
    let defaults = defaults?;
    for param in &mut parameters {
        param.default = defaults.get(&param.name).cloned().ok_or_else(|| {
            Error::Other(format!(
                "{} form field '{}' has no default",
                calculation.name(),
                param.name
            ))
        })?;
    }
    Ok(CalculationForm {
        calculation,
        title: calculation.title().to_string(),
        parameters,
    })
}

/// Forms for every calculation, in registry order
///
/// # Errors
///
/// See [`parameter_definitions`]
pub fn all_forms() -> Result<Vec<CalculationForm>> {
    Calculation::ALL
        .iter()
        .map(|&c| parameter_definitions(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::DeserializeOwned;
    use std::fmt::Debug;

    fn untouched_form_parses_to_default<T>(calculation: Calculation)
    where
        T: DeserializeOwned + Default + PartialEq + Debug,
    {
        let form = parameter_definitions(calculation).unwrap();
        let parsed: T = form.default_params().parse().unwrap();
        assert_eq!(parsed, T::default(), "{calculation}");
    }

    #[test]
    fn test_defaults_round_trip_through_forms() {
        untouched_form_parses_to_default::<VshParams>(Calculation::Vsh);
        untouched_form_parses_to_default::<VshDnParams>(Calculation::VshDn);
        untouched_form_parses_to_default::<PorosityParams>(Calculation::Porosity);
        untouched_form_parses_to_default::<GsaParams>(Calculation::Gsa);
        untouched_form_parses_to_default::<SwParams>(Calculation::Sw);
        untouched_form_parses_to_default::<RwaParams>(Calculation::Rwa);
        untouched_form_parses_to_default::<RgbeRpbeParams>(Calculation::RgbeRpbe);
        untouched_form_parses_to_default::<RtR0Params>(Calculation::RtR0);
        untouched_form_parses_to_default::<SwgradParams>(Calculation::Swgrad);
        untouched_form_parses_to_default::<DnsDnsvParams>(Calculation::DnsDnsv);
        untouched_form_parses_to_default::<NormalizationParams>(Calculation::Normalization);
    }

    #[test]
    fn test_every_calculation_has_a_form() {
        let forms = all_forms().unwrap();
        assert_eq!(forms.len(), Calculation::ALL.len());
        assert!(forms.iter().all(|f| !f.parameters.is_empty()));
    }

    #[test]
    fn test_documented_defaults() {
        let vsh = parameter_definitions(Calculation::Vsh).unwrap();
        assert_eq!(vsh.parameters[0].default, serde_json::json!(30.0));
        assert_eq!(vsh.parameters[1].default, serde_json::json!(120.0));

        let sw = parameter_definitions(Calculation::Sw).unwrap();
        let method = &sw.parameters[0];
        assert_eq!(method.default, serde_json::json!("simple"));
        assert_eq!(method.options, vec!["simple", "full", "tar", "archie"]);

        let swgrad = parameter_definitions(Calculation::Swgrad).unwrap();
        let ftemp = swgrad.parameters.iter().find(|p| p.name == "FTEMP").unwrap();
        assert!(ftemp.default.is_null());
    }

    #[test]
    fn test_rt_r0_form_omits_saturation_exponent() {
        let names = |c| -> Vec<String> {
            parameter_definitions(c)
                .unwrap()
                .parameters
                .into_iter()
                .map(|p| p.name)
                .collect()
        };
        let rt_r0 = names(Calculation::RtR0);
        assert!(rt_r0.contains(&"M".to_string()));
        assert!(!rt_r0.contains(&"N".to_string()));
        assert!(names(Calculation::Sw).contains(&"N".to_string()));
        // still accepted from older forms
        let params: RtR0Params = crate::ParamSet::new().with("N", "2.0").parse().unwrap();
        assert_eq!(params, RtR0Params::default());
    }

    #[test]
    fn test_serialised_shape() {
        let form = parameter_definitions(Calculation::Gsa).unwrap();
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["calculation"], "gsa");
        assert_eq!(json["parameters"][0]["type"], "integer");
        assert_eq!(json["parameters"][0]["default"], 50);
        assert!(json["parameters"][0].get("options").is_none());
    }
}
