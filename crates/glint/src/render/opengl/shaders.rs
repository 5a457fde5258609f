//! GLSL program assembly
//!
//! One program covers every draw command. The `#version` directive is
//! synthesized at runtime from the lowest of the reported GL and GLSL
//! versions, so a single source body compiles from desktop GLSL 1.30
//! through 4.60 and GLSL ES 3.00 up. Attribute locations are queried
//! after linking rather than pinned with layout qualifiers, which keeps
//! the sources valid on pre-3.30 desktop profiles.

use glow::HasContext;

use super::versions::{GlVersion, GlslVersion};
use crate::render::{RendererError, RendererResult};

const VERTEX_BODY: &str = r"
in vec2 a_pos;
in vec2 a_uv;
in vec4 a_color;

uniform mat4 u_projection;

out vec2 v_uv;
out vec4 v_color;

// Vertex colors arrive sRGB-encoded; blending wants linear.
vec4 to_linear(vec4 srgb) {
    vec3 c = srgb.rgb;
    vec3 cutoff = ceil(c - 0.04045);
    vec3 low = c / 12.92;
    vec3 high = pow((c + 0.055) / 1.055, vec3(2.4));
    return vec4(mix(low, high, cutoff), srgb.a);
}

void main() {
    v_uv = a_uv;
    v_color = to_linear(a_color);
    gl_Position = u_projection * vec4(a_pos.xy, 0.0, 1.0);
}
";

const FRAGMENT_BODY: &str = r"
in vec2 v_uv;
in vec4 v_color;

uniform sampler2D u_texture;

out vec4 f_color;

vec4 to_srgb(vec4 lin) {
    vec3 c = lin.rgb;
    vec3 cutoff = ceil(c - 0.0031308);
    vec3 low = c * 12.92;
    vec3 high = pow(c, vec3(1.0 / 2.4)) * 1.055 - 0.055;
    return vec4(mix(low, high, cutoff), lin.a);
}

void main() {
    vec4 lin = v_color * texture(u_texture, v_uv.st);
#ifdef OUTPUT_SRGB
    f_color = to_srgb(lin);
#else
    f_color = lin;
#endif
}
";

/// Picks the `#version` directive to target, taking the lower of the
/// two reported versions; drivers have been seen disagreeing between
/// `GL_VERSION` and the GLSL version.
pub(super) fn negotiated_directive(gl_version: GlVersion, probed: GlslVersion) -> GlslVersion {
    let (major, minor) =
        if (gl_version.major, gl_version.minor) < (probed.major, probed.minor) {
            (gl_version.major, gl_version.minor)
        } else {
            (probed.major, probed.minor)
        };
    GlslVersion { major, minor, is_gles: gl_version.is_gles || probed.is_gles }
}

/// Assembles vertex and fragment sources targeting `directive`.
///
/// `output_srgb` selects whether the fragment shader encodes its output
/// back to sRGB, for rendering into a non-sRGB default framebuffer.
pub(super) fn shader_sources(
    gl_version: GlVersion,
    directive: GlslVersion,
    output_srgb: bool,
) -> RendererResult<(String, String)> {
    let is_gles = gl_version.is_gles || directive.is_gles;
    let (major, minor) = (directive.major, directive.minor);

    if is_gles && gl_version.major < 2 {
        return Err(RendererError::UnsupportedVersion(format!(
            "OpenGL ES {}.{}; OpenGL 3.0 or OpenGL ES 2.0 required",
            gl_version.major, gl_version.minor
        )));
    }
    if !is_gles && gl_version.major < 3 {
        return Err(RendererError::UnsupportedVersion(format!(
            "OpenGL {}.{}; OpenGL 3.0 or OpenGL ES 2.0 required",
            gl_version.major, gl_version.minor
        )));
    }

    let number = major * 100 + minor * 10;
    // The `es` profile token only exists from GLSL ES 3.00.
    let profile = if is_gles && number >= 300 { " es" } else { "" };
    let precision = if is_gles {
        "\nprecision mediump float;"
    } else {
        ""
    };

    let vertex = format!("#version {number}{profile}{precision}\n{VERTEX_BODY}");
    let fragment = format!(
        "#version {number}{profile}{precision}{define}\n{FRAGMENT_BODY}",
        define = if output_srgb {
            "\n#define OUTPUT_SRGB"
        } else {
            ""
        },
    );

    Ok((vertex, fragment))
}

/// Linked program plus the symbol locations the draw path binds every
/// frame.
pub(super) struct Shaders {
    pub(super) program: glow::Program,
    pub(super) texture_uniform: glow::UniformLocation,
    pub(super) projection_uniform: glow::UniformLocation,
    pub(super) position_attrib: u32,
    pub(super) uv_attrib: u32,
    pub(super) color_attrib: u32,
}

impl Shaders {
    pub(super) fn compile(
        gl: &glow::Context,
        gl_version: GlVersion,
        glsl_override: Option<GlslVersion>,
        output_srgb: bool,
    ) -> RendererResult<Self> {
        // An explicit directive from the caller is used as given; only
        // without one do the probed versions pick it.
        let directive = glsl_override
            .unwrap_or_else(|| negotiated_directive(gl_version, GlslVersion::read(gl)));
        let (vertex_source, fragment_source) =
            shader_sources(gl_version, directive, output_srgb)?;

        let vertex = compile_stage(gl, glow::VERTEX_SHADER, &vertex_source)?;
        let fragment = compile_stage(gl, glow::FRAGMENT_SHADER, &fragment_source)?;

        let program = unsafe { gl.create_program() }
            .map_err(|detail| RendererError::CreateObject { what: "shader program", detail })?;
        unsafe {
            gl.attach_shader(program, vertex);
            gl.attach_shader(program, fragment);
            gl.link_program(program);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(RendererError::LinkProgram(log));
            }

            // Stage objects are only needed for linking.
            gl.detach_shader(program, vertex);
            gl.detach_shader(program, fragment);
            gl.delete_shader(vertex);
            gl.delete_shader(fragment);
        }

        Ok(unsafe {
            Self {
                program,
                texture_uniform: gl
                    .get_uniform_location(program, "u_texture")
                    .ok_or(RendererError::MissingShaderSymbol("u_texture"))?,
                projection_uniform: gl
                    .get_uniform_location(program, "u_projection")
                    .ok_or(RendererError::MissingShaderSymbol("u_projection"))?,
                position_attrib: gl
                    .get_attrib_location(program, "a_pos")
                    .ok_or(RendererError::MissingShaderSymbol("a_pos"))?,
                uv_attrib: gl
                    .get_attrib_location(program, "a_uv")
                    .ok_or(RendererError::MissingShaderSymbol("a_uv"))?,
                color_attrib: gl
                    .get_attrib_location(program, "a_color")
                    .ok_or(RendererError::MissingShaderSymbol("a_color"))?,
            }
        })
    }

    pub(super) fn destroy(&self, gl: &glow::Context) {
        unsafe { gl.delete_program(self.program) };
    }
}

fn compile_stage(gl: &glow::Context, stage: u32, source: &str) -> RendererResult<glow::Shader> {
    let what = if stage == glow::VERTEX_SHADER {
        "vertex shader"
    } else {
        "fragment shader"
    };
    let shader = unsafe { gl.create_shader(stage) }
        .map_err(|detail| RendererError::CreateObject { what, detail })?;
    unsafe {
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(RendererError::CompileShader(log));
        }
    }
    Ok(shader)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glsl(major: u16, minor: u16, is_gles: bool) -> GlslVersion {
        GlslVersion { major, minor, is_gles }
    }

    #[test]
    fn test_negotiation_targets_lower_of_gl_and_glsl() {
        assert_eq!(
            negotiated_directive(GlVersion::gl(4, 6), glsl(4, 6, false)),
            glsl(4, 6, false)
        );
        // GL 3.0 reports GLSL 1.30; the directive follows the GLSL side.
        assert_eq!(
            negotiated_directive(GlVersion::gl(3, 0), glsl(1, 3, false)),
            glsl(1, 3, false)
        );
        assert_eq!(
            negotiated_directive(GlVersion::gl(3, 2), glsl(4, 6, false)),
            glsl(3, 2, false)
        );
    }

    #[test]
    fn test_desktop_directive_numbering() {
        let (vertex, fragment) =
            shader_sources(GlVersion::gl(4, 6), glsl(4, 6, false), false).unwrap();
        assert!(vertex.starts_with("#version 460\n"));
        assert!(fragment.starts_with("#version 460\n"));

        // A caller directive is taken as given, not re-negotiated.
        let (vertex, _) = shader_sources(GlVersion::gl(4, 6), glsl(1, 5, false), false).unwrap();
        assert!(vertex.starts_with("#version 150\n"));
    }

    #[test]
    fn test_gles_directive_carries_profile_and_precision() {
        let (vertex, fragment) =
            shader_sources(GlVersion::gles(3, 2), glsl(3, 2, true), false).unwrap();
        assert!(vertex.starts_with("#version 320 es\nprecision mediump float;\n"));
        assert!(fragment.starts_with("#version 320 es\nprecision mediump float;\n"));
    }

    #[test]
    fn test_srgb_define_only_when_requested() {
        let (_, fragment) = shader_sources(GlVersion::gl(3, 3), glsl(3, 3, false), true).unwrap();
        assert!(fragment.contains("#define OUTPUT_SRGB"));

        let (vertex, fragment) =
            shader_sources(GlVersion::gl(3, 3), glsl(3, 3, false), false).unwrap();
        assert!(!fragment.contains("OUTPUT_SRGB"));
        assert!(!vertex.contains("OUTPUT_SRGB"));
    }

    #[test]
    fn test_version_floor_rejected() {
        assert!(matches!(
            shader_sources(GlVersion::gl(2, 1), glsl(1, 2, false), false),
            Err(RendererError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            shader_sources(GlVersion::gles(1, 1), glsl(1, 0, true), false),
            Err(RendererError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_sources_name_every_bound_symbol() {
        let (vertex, fragment) =
            shader_sources(GlVersion::gl(3, 3), glsl(3, 3, false), false).unwrap();
        for attrib in ["a_pos", "a_uv", "a_color", "u_projection"] {
            assert!(vertex.contains(attrib), "vertex shader lost {attrib}");
        }
        assert!(fragment.contains("u_texture"));
    }
}
