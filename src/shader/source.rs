/// Line vertex stage (WGSL).
///
/// Each drawn vertex sees three consecutive-rail records: the previous,
/// current and next anchor of the same rail. The ribbon is expanded
/// perpendicular to the averaged direction, to the side selected by the
/// parity of the ordinal index.
pub const LINE_VERTEX_SHADER_SOURCE: &str = r#"
struct LineUniforms {
    cam_matrix: mat3x3<f32>,
    thickness: f32,
    color: vec3<f32>,
    render_wireframe: u32,
}

@group(0) @binding(0)
var<uniform> uniforms: LineUniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) barycentric: vec3<f32>,
}

fn safe_normalize(v: vec2<f32>) -> vec2<f32> {
    let len = length(v);
    if (len < 1e-6) {
        return vec2<f32>(0.0, 0.0);
    }
    return v / len;
}

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) a_prev_pack: vec3<f32>,
    @location(1) a_current_pack: vec3<f32>,
    @location(2) a_next_pack: vec3<f32>,
) -> VertexOutput {
    let prev = a_prev_pack.xy;
    let current = a_current_pack.xy;
    let next = a_next_pack.xy;

    let incoming = safe_normalize(current - prev);
    let outgoing = safe_normalize(next - current);
    var tangent = safe_normalize(incoming + outgoing);
    if (dot(tangent, tangent) < 0.5) {
        // start, end or a full reversal
        tangent = select(incoming, outgoing, dot(outgoing, outgoing) > 0.5);
    }
    let normal = vec2<f32>(-tangent.y, tangent.x);

    let even = (u32(a_current_pack.z) & 1u) == 0u;
    let side = select(-1.0, 1.0, even);
    let world = current + normal * side * uniforms.thickness * 0.5;
    let clip = uniforms.cam_matrix * vec3<f32>(world, 1.0);

    let corner = vertex_index % 3u;

    var out: VertexOutput;
    out.clip_position = vec4<f32>(clip.xy, 0.0, 1.0);
    out.barycentric = vec3<f32>(
        select(0.0, 1.0, corner == 0u),
        select(0.0, 1.0, corner == 1u),
        select(0.0, 1.0, corner == 2u),
    );
    return out;
}
"#;

/// Line fragment stage (WGSL).
///
/// Solid color, or triangle edges only when the wireframe flag is set.
pub const LINE_FRAGMENT_SHADER_SOURCE: &str = r#"
struct LineUniforms {
    cam_matrix: mat3x3<f32>,
    thickness: f32,
    color: vec3<f32>,
    render_wireframe: u32,
}

@group(0) @binding(0)
var<uniform> uniforms: LineUniforms;

@fragment
fn fs_main(@location(0) barycentric: vec3<f32>) -> @location(0) vec4<f32> {
    let width = fwidth(barycentric);
    let edge = smoothstep(vec3<f32>(0.0), width * 1.5, barycentric);
    let edge_factor = min(min(edge.x, edge.y), edge.z);

    if (uniforms.render_wireframe != 0u) {
        return vec4<f32>(uniforms.color, 1.0 - edge_factor);
    }
    return vec4<f32>(uniforms.color, 1.0);
}
"#;
