//! Export variants: one named image target per output file.
//!
//! A variant starts life as a [`VariantSpec`] parsed from a `--variant` token
//! (or taken from the built-in set) and is turned into a fully-resolved
//! [`Variant`] once the job-wide defaults are known.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Largest device scale factor handed to the renderer. Higher requests are capped.
pub const MAX_DEVICE_SCALE_FACTOR: f64 = 8.0;

/// Image encoding of a captured variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Jpeg,
    Png,
    Webp,
}

impl Encoding {
    /// Name used on the command line and in the DevTools protocol
    pub fn as_str(self) -> &'static str {
        match self {
            Encoding::Jpeg => "jpeg",
            Encoding::Png => "png",
            Encoding::Webp => "webp",
        }
    }

    /// File extension; `jpeg` is shortened to `jpg`, the rest pass through.
    pub fn extension(self) -> &'static str {
        match self {
            Encoding::Jpeg => "jpg",
            other => other.as_str(),
        }
    }

    /// Whether a quality value is sent with the capture request
    pub fn uses_quality(self) -> bool {
        matches!(self, Encoding::Jpeg)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" => Ok(Encoding::Jpeg),
            "png" => Ok(Encoding::Png),
            "webp" => Ok(Encoding::Webp),
            _ => Err(Error::UnsupportedEncoding(s.to_string())),
        }
    }
}

/// Job-wide fallbacks applied to variants that leave a field unset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantDefaults {
    pub encoding: Encoding,
    pub quality: f64,
    pub scale: f64,
}

impl Default for VariantDefaults {
    fn default() -> Self {
        Self {
            encoding: Encoding::Jpeg,
            quality: 92.0,
            scale: 2.0,
        }
    }
}

/// A partially specified variant, as declared by the user or the built-in set
#[derive(Debug, Clone, PartialEq)]
pub struct VariantSpec {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub scale: Option<f64>,
    pub encoding: Option<Encoding>,
    pub quality: Option<f64>,
}

impl VariantSpec {
    fn builtin(name: &str, width: u32, height: u32, scale: f64) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            scale: Some(scale),
            encoding: None,
            quality: None,
        }
    }

    /// The three variants used when no `--variant` is given: standard, medium, high.
    pub fn builtin_set() -> Vec<VariantSpec> {
        vec![
            Self::builtin("standard", 1920, 1080, 2.0),
            Self::builtin("medium", 1600, 900, 2.0),
            Self::builtin("high", 2400, 1350, 2.5),
        ]
    }

    /// Fill unset fields from `defaults` and apply the scale and quality limits.
    pub fn resolve(&self, defaults: &VariantDefaults) -> Variant {
        let encoding = self.encoding.unwrap_or(defaults.encoding);
        let quality = encoding
            .uses_quality()
            .then(|| clamp_quality(self.quality.unwrap_or(defaults.quality)));
        Variant {
            name: self.name.clone(),
            width: self.width,
            height: self.height,
            device_scale_factor: clamp_scale(self.scale.unwrap_or(defaults.scale)),
            encoding,
            quality,
        }
    }
}

impl FromStr for VariantSpec {
    type Err = Error;

    /// Parse `name:WIDTHxHEIGHT[@SCALE][,type=ENCODING][,quality=N][,scale=N]`.
    fn from_str(input: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidVariant {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let (name, rest) = input
            .split_once(':')
            .ok_or_else(|| invalid("must look like name:WIDTHxHEIGHT@SCALE"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid("is missing a name"));
        }
        if name.contains(['/', '\\']) || name.contains("..") {
            return Err(invalid("has a name that is not a plain file name"));
        }

        let mut clauses = rest.split(',');
        let size = clauses.next().unwrap_or_default();
        let (dimensions, scale) = match size.split_once('@') {
            Some((dims, scale)) => (dims, Some(scale)),
            None => (size, None),
        };
        let dimensions = dimensions.to_ascii_lowercase();
        let (width, height) = match dimensions.split_once('x') {
            Some((w, h)) if !w.trim().is_empty() && !h.trim().is_empty() => (w, h),
            _ => return Err(invalid("is missing WIDTHxHEIGHT dimensions")),
        };

        let mut spec = VariantSpec {
            name: name.to_string(),
            width: parse_pixels(width, "variant width")?,
            height: parse_pixels(height, "variant height")?,
            scale: scale
                .filter(|s| !s.trim().is_empty())
                .map(|s| parse_positive(s, "variant scale"))
                .transpose()?,
            encoding: None,
            quality: None,
        };

        for clause in clauses {
            let (key, value) = clause.split_once('=').unwrap_or((clause, ""));
            let (key, value) = (key.trim(), value.trim());
            match key {
                "" => continue,
                "type" => spec.encoding = Some(value.parse()?),
                "quality" => spec.quality = Some(parse_finite(value, "variant quality")?),
                "scale" => {
                    // `@SCALE` takes precedence over a later `,scale=`
                    if spec.scale.is_none() {
                        spec.scale = Some(parse_positive(value, "variant scale")?);
                    }
                }
                other => {
                    return Err(Error::UnknownVariantOption {
                        key: other.to_string(),
                        input: input.to_string(),
                    })
                }
            }
        }

        Ok(spec)
    }
}

/// A fully resolved export target
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    /// Identifier, unique within a job, used as the filename suffix
    pub name: String,
    /// Viewport width in CSS pixels
    pub width: u32,
    /// Viewport height in CSS pixels
    pub height: u32,
    /// Pixel density multiplier, never above [`MAX_DEVICE_SCALE_FACTOR`]
    pub device_scale_factor: f64,
    pub encoding: Encoding,
    /// Capture quality in 1..=100; only set for jpeg
    pub quality: Option<u8>,
}

impl Variant {
    /// Output filename for this variant. The primary variant carries no suffix.
    ///
    /// "Primary" is positional, not name-based: when the first variant is
    /// `preview` it writes `<base>.jpg`, not `<base>_preview.jpg`, and a
    /// `standard` variant declared second still gets its `_standard` suffix.
    pub fn file_name(&self, base_name: &str, primary: bool) -> String {
        let ext = self.encoding.extension();
        if primary {
            format!("{base_name}.{ext}")
        } else {
            format!("{base_name}_{}.{ext}", self.name)
        }
    }
}

/// Parse a strictly positive number, as every size and scale must be.
pub fn parse_positive(value: &str, label: &'static str) -> Result<f64> {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => Ok(n),
        _ => Err(Error::InvalidNumber {
            label,
            value: value.to_string(),
        }),
    }
}

/// Parse any finite number; range limits are applied later by clamping.
pub fn parse_finite(value: &str, label: &'static str) -> Result<f64> {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(Error::InvalidNumber {
            label,
            value: value.to_string(),
        }),
    }
}

fn parse_pixels(value: &str, label: &'static str) -> Result<u32> {
    let n = parse_positive(value, label)?.round();
    if n < 1.0 || n > u32::MAX as f64 {
        return Err(Error::InvalidNumber {
            label,
            value: value.to_string(),
        });
    }
    Ok(n as u32)
}

/// Cap a scale factor at [`MAX_DEVICE_SCALE_FACTOR`].
pub fn clamp_scale(scale: f64) -> f64 {
    scale.min(MAX_DEVICE_SCALE_FACTOR)
}

/// Round a quality value into the encoder's 1..=100 range.
pub fn clamp_quality(quality: f64) -> u8 {
    quality.round().clamp(1.0, 100.0) as u8
}
