//! Resolved-color plumbing.
//!
//! Color *resolution* belongs to the host: it owns the theme and maps a
//! color id to concrete channels. The toolkit only carries what the drawing
//! callback needs - an already-resolved RGBA vector - plus the two
//! adjustments the original controls apply on top: an alpha override and a
//! greyscale toggle for inactive surfaces.

use serde::{Deserialize, Serialize};

/// An RGBA color, channels in 0–1.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Create a color from channel values.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Rec. 601 luma greyscale of this color, alpha preserved.
    pub fn to_greyscale(self) -> Self {
        let luma = 0.299 * self.r + 0.587 * self.g + 0.114 * self.b;
        Self::new(luma, luma, luma, self.a)
    }

    /// This color with its alpha replaced.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { a: alpha, ..self }
    }
}

impl From<[f32; 4]> for Rgba {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

/// Host capability mapping a color id to resolved channels.
///
/// Injected at surface construction; the toolkit never consults ambient
/// host state.
pub trait ColorResolver {
    /// Resolve `id` to channels. Unknown ids resolve to the host's choice
    /// of fallback.
    fn resolve(&self, id: &str) -> Rgba;
}

/// Resolver for hosts without a theme: every id resolves to black.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTheme;

impl ColorResolver for NoTheme {
    fn resolve(&self, _id: &str) -> Rgba {
        Rgba::BLACK
    }
}

/// Where a dynamic color's channels come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSource {
    /// A host theme id, resolved at read time.
    Id(String),
    /// Literal channels.
    Literal(Rgba),
}

/// A named color with host-side resolution and local adjustments.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicColor {
    source: ColorSource,
    /// Alpha override, clamped to 0–1. `None` keeps the resolved alpha.
    alpha: Option<f32>,
    greyscale: bool,
}

impl DynamicColor {
    /// A color resolved from a host theme id.
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            source: ColorSource::Id(id.into()),
            alpha: None,
            greyscale: false,
        }
    }

    /// A color with literal channels.
    pub fn from_rgba(rgba: impl Into<Rgba>) -> Self {
        Self {
            source: ColorSource::Literal(rgba.into()),
            alpha: None,
            greyscale: false,
        }
    }

    /// Replace the source (theme id or literal channels).
    pub fn set_source(&mut self, source: ColorSource) {
        self.source = source;
    }

    /// Override the alpha channel, clamped into 0–1.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = Some(alpha.clamp(0.0, 1.0));
    }

    /// Toggle greyscale rendering (used while the surface is inactive).
    pub fn set_greyscale(&mut self, greyscale: bool) {
        self.greyscale = greyscale;
    }

    /// Whether greyscale rendering is on.
    pub fn is_greyscale(&self) -> bool {
        self.greyscale
    }

    /// Resolve to channels through `resolver`, applying the alpha override
    /// and greyscale toggle.
    pub fn resolve(&self, resolver: &dyn ColorResolver) -> Rgba {
        let mut color = match &self.source {
            ColorSource::Id(id) => resolver.resolve(id),
            ColorSource::Literal(rgba) => *rgba,
        };
        if let Some(alpha) = self.alpha {
            color = color.with_alpha(alpha);
        }
        if self.greyscale {
            color = color.to_greyscale();
        }
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OneColorTheme;

    impl ColorResolver for OneColorTheme {
        fn resolve(&self, id: &str) -> Rgba {
            match id {
                "accent" => Rgba::new(0.2, 0.4, 0.8, 1.0),
                _ => Rgba::BLACK,
            }
        }
    }

    #[test]
    fn test_id_resolution_goes_through_host() {
        let color = DynamicColor::from_id("accent");
        assert_eq!(color.resolve(&OneColorTheme), Rgba::new(0.2, 0.4, 0.8, 1.0));
        let unknown = DynamicColor::from_id("nope");
        assert_eq!(unknown.resolve(&OneColorTheme), Rgba::BLACK);
    }

    #[test]
    fn test_alpha_override_is_clamped() {
        let mut color = DynamicColor::from_rgba([0.5, 0.5, 0.5, 1.0]);
        color.set_alpha(2.0);
        assert_eq!(color.resolve(&NoTheme).a, 1.0);
        color.set_alpha(-1.0);
        assert_eq!(color.resolve(&NoTheme).a, 0.0);
    }

    #[test]
    fn test_greyscale_uses_luma_and_keeps_alpha() {
        let mut color = DynamicColor::from_rgba([1.0, 0.0, 0.0, 0.5]);
        color.set_greyscale(true);
        let resolved = color.resolve(&NoTheme);
        assert!((resolved.r - 0.299).abs() < 1e-6);
        assert_eq!(resolved.r, resolved.g);
        assert_eq!(resolved.g, resolved.b);
        assert_eq!(resolved.a, 0.5);
    }
}
