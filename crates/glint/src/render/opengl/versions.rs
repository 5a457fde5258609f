//! Runtime OpenGL and GLSL version detection
//!
//! The renderer targets everything from OpenGL 3.0 / OpenGL ES 2.0 up,
//! so instead of compile-time profiles it parses the driver's version
//! strings once at init and gates optional API usage on the result.

use glow::HasContext;

/// Parsed `GL_VERSION`, with desktop GL and GLES kept apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlVersion {
    /// Major version number.
    pub major: u16,
    /// Minor version number.
    pub minor: u16,
    /// Whether the context is OpenGL ES rather than desktop OpenGL.
    pub is_gles: bool,
}

impl GlVersion {
    /// Desktop OpenGL version literal.
    #[must_use]
    pub const fn gl(major: u16, minor: u16) -> Self {
        Self { major, minor, is_gles: false }
    }

    /// OpenGL ES version literal.
    #[must_use]
    pub const fn gles(major: u16, minor: u16) -> Self {
        Self { major, minor, is_gles: true }
    }

    /// Queries `GL_VERSION` from the live context.
    pub fn read(gl: &glow::Context) -> Self {
        Self::parse(&unsafe { gl.get_parameter_string(glow::VERSION) })
    }

    /// Parses a `GL_VERSION` string.
    ///
    /// Drivers report `<major>.<minor>[.<release>][ <vendor info>]` for
    /// desktop GL and the same with an `OpenGL ES ` prefix for GLES, so
    /// strip the prefix, then take the first two numeric runs.
    #[must_use]
    pub fn parse(version_string: &str) -> Self {
        let (rest, is_gles) = version_string
            .strip_prefix("OpenGL ES ")
            .map_or((version_string, false), |rest| (rest, true));

        let mut parts = rest.split(|c: char| !c.is_numeric());
        let major = parts.next().unwrap_or("0").parse().unwrap_or(0);
        let minor = parts.next().unwrap_or("0").parse().unwrap_or(0);

        Self { major, minor, is_gles }
    }

    /// `glBindVertexArray` needs GL 3.0 or GLES 3.0.
    #[must_use]
    pub const fn bind_vertex_array_support(self) -> bool {
        self.major >= 3
    }

    /// `glDrawElementsBaseVertex` needs desktop GL 3.2.
    #[must_use]
    pub fn vertex_offset_support(self) -> bool {
        self >= Self::gl(3, 2)
    }

    /// `glBindSampler` needs desktop GL 3.2 or GLES 3.0.
    #[must_use]
    pub fn bind_sampler_support(self) -> bool {
        self >= Self::gl(3, 2) || self >= Self::gles(3, 0)
    }

    /// `GL_CLIP_ORIGIN` queries need desktop GL 4.5.
    #[must_use]
    pub fn clip_origin_support(self) -> bool {
        self >= Self::gl(4, 5)
    }

    /// `glPolygonMode` exists on desktop GL only.
    #[must_use]
    pub const fn polygon_mode_support(self) -> bool {
        !self.is_gles
    }

    /// `GL_PRIMITIVE_RESTART` toggling needs desktop GL 3.1.
    #[must_use]
    pub fn primitive_restart_support(self) -> bool {
        self >= Self::gl(3, 1)
    }
}

/// Versions compare within one API family only; a desktop GL version is
/// never ordered against a GLES one.
impl PartialOrd for GlVersion {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        (self.is_gles == other.is_gles).then(|| {
            self.major
                .cmp(&other.major)
                .then(self.minor.cmp(&other.minor))
        })
    }
}

/// Parsed `GL_SHADING_LANGUAGE_VERSION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlslVersion {
    /// Major version number.
    pub major: u16,
    /// Minor version number, normalized to a single digit.
    pub minor: u16,
    /// Whether the language is GLSL ES.
    pub is_gles: bool,
}

impl GlslVersion {
    /// Queries `GL_SHADING_LANGUAGE_VERSION` from the live context.
    pub fn read(gl: &glow::Context) -> Self {
        Self::parse(&unsafe { gl.get_parameter_string(glow::SHADING_LANGUAGE_VERSION) })
    }

    /// Parses a caller-supplied `#version` directive such as
    /// `"#version 130"` or `"#version 300 es"`; the `#version` prefix is
    /// optional. Returns `None` when no version number can be read.
    ///
    /// A bare `100` reads as GLSL ES 1.00, which is the only version
    /// number below desktop GLSL's 1.10 floor.
    #[must_use]
    pub fn parse_directive(directive: &str) -> Option<Self> {
        let rest = directive.trim();
        let rest = rest.strip_prefix("#version").unwrap_or(rest).trim();

        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        let number: u16 = digits.parse().ok()?;
        let tail = rest[digits.len()..].trim();
        if !tail.is_empty() && tail != "es" {
            return None;
        }

        let is_gles = tail == "es" || number == 100;
        Some(Self { major: number / 100, minor: (number % 100) / 10, is_gles })
    }

    /// Parses a `GL_SHADING_LANGUAGE_VERSION` string.
    ///
    /// GLSL ES strings carry an `OpenGL ES GLSL ES ` prefix (though some
    /// drivers omit it), and the minor version shows up both as one and
    /// two digits in the wild, so `4.60` and `4.6` parse the same.
    #[must_use]
    pub fn parse(version_string: &str) -> Self {
        let (rest, is_gles) = version_string
            .strip_prefix("OpenGL ES GLSL ES ")
            .map_or((version_string, false), |rest| (rest, true));

        let mut parts = rest.split(|c: char| !c.is_numeric());
        let major = parts.next().unwrap_or("0").parse().unwrap_or(0);
        let minor: u16 = parts.next().unwrap_or("0").parse().unwrap_or(0);
        let minor = if minor >= 10 { minor / 10 } else { minor };

        Self { major, minor, is_gles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_desktop_gl_version() {
        let version = GlVersion::parse("4.6.0 NVIDIA 465.27");
        assert_eq!(version, GlVersion::gl(4, 6));

        let version = GlVersion::parse("3.3 (Core Profile) Mesa 23.1.9");
        assert_eq!(version, GlVersion::gl(3, 3));
    }

    #[test]
    fn test_parse_gles_version() {
        let version = GlVersion::parse("OpenGL ES 3.2 NVIDIA 465.27");
        assert_eq!(version, GlVersion::gles(3, 2));
    }

    #[test]
    fn test_parse_garbage_reads_as_zero() {
        assert_eq!(GlVersion::parse(""), GlVersion::gl(0, 0));
        assert_eq!(GlVersion::parse("unknown"), GlVersion::gl(0, 0));
    }

    #[test]
    fn test_versions_order_within_one_api_only() {
        assert!(GlVersion::gl(3, 2) >= GlVersion::gl(3, 2));
        assert!(GlVersion::gl(4, 0) > GlVersion::gl(3, 3));
        assert!(GlVersion::gl(3, 0) < GlVersion::gl(3, 1));
        assert_eq!(
            GlVersion::gl(4, 6).partial_cmp(&GlVersion::gles(3, 2)),
            None
        );
    }

    #[test]
    fn test_capability_gates() {
        assert!(GlVersion::gl(3, 2).vertex_offset_support());
        assert!(!GlVersion::gl(3, 1).vertex_offset_support());
        assert!(!GlVersion::gles(3, 2).vertex_offset_support());

        assert!(GlVersion::gles(3, 0).bind_sampler_support());
        assert!(!GlVersion::gles(2, 0).bind_sampler_support());
        assert!(GlVersion::gl(3, 2).bind_sampler_support());

        assert!(GlVersion::gl(4, 5).clip_origin_support());
        assert!(!GlVersion::gl(4, 4).clip_origin_support());

        assert!(GlVersion::gl(2, 1).polygon_mode_support());
        assert!(!GlVersion::gles(3, 2).polygon_mode_support());

        assert!(GlVersion::gl(3, 1).primitive_restart_support());
        assert!(!GlVersion::gles(3, 1).primitive_restart_support());
    }

    #[test]
    fn test_parse_glsl_minor_digit_forms() {
        let version = GlslVersion::parse("4.60 NVIDIA");
        assert_eq!(version, GlslVersion { major: 4, minor: 6, is_gles: false });

        let version = GlslVersion::parse("4.6");
        assert_eq!(version, GlslVersion { major: 4, minor: 6, is_gles: false });

        let version = GlslVersion::parse("OpenGL ES GLSL ES 3.20");
        assert_eq!(version, GlslVersion { major: 3, minor: 2, is_gles: true });
    }

    #[test]
    fn test_parse_directive_forms() {
        assert_eq!(
            GlslVersion::parse_directive("#version 130"),
            Some(GlslVersion { major: 1, minor: 3, is_gles: false })
        );
        assert_eq!(
            GlslVersion::parse_directive("#version 300 es"),
            Some(GlslVersion { major: 3, minor: 0, is_gles: true })
        );
        assert_eq!(
            GlslVersion::parse_directive("460"),
            Some(GlslVersion { major: 4, minor: 6, is_gles: false })
        );
        assert_eq!(
            GlslVersion::parse_directive("  #version 150  "),
            Some(GlslVersion { major: 1, minor: 5, is_gles: false })
        );
    }

    #[test]
    fn test_parse_directive_treats_bare_100_as_gles() {
        assert_eq!(
            GlslVersion::parse_directive("#version 100"),
            Some(GlslVersion { major: 1, minor: 0, is_gles: true })
        );
    }

    #[test]
    fn test_parse_directive_rejects_garbage() {
        assert_eq!(GlslVersion::parse_directive(""), None);
        assert_eq!(GlslVersion::parse_directive("#version"), None);
        assert_eq!(GlslVersion::parse_directive("#version banana"), None);
        assert_eq!(GlslVersion::parse_directive("#version 130 core"), None);
    }
}
