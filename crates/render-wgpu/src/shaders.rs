/// WGSL shader for scene meshes: hemisphere, directional and point
/// lighting with linear fog and an exposure scale.
pub const SCENE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    // rgb = fog color, a = exposure
    fog_color: vec4<f32>,
    // x = fog near, y = fog far
    fog_range: vec4<f32>,
    // rgb = color, a = intensity
    sky_color: vec4<f32>,
    ground_color: vec4<f32>,
    // xyz = direction toward the light
    sun_direction: vec4<f32>,
    sun_color: vec4<f32>,
    // xyz = position, w = range
    point_position: vec4<f32>,
    point_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_position = world_pos.xyz;
    out.world_normal = normalize(world_normal);
    out.color = instance.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front: bool) -> @location(0) vec4<f32> {
    var n = normalize(in.world_normal);
    if !front {
        n = -n;
    }

    let hemi_mix = n.y * 0.5 + 0.5;
    let hemi = mix(uniforms.ground_color.rgb, uniforms.sky_color.rgb, hemi_mix)
        * uniforms.sky_color.a;

    let sun_dir = normalize(uniforms.sun_direction.xyz);
    let sun = uniforms.sun_color.rgb * uniforms.sun_color.a * max(dot(n, sun_dir), 0.0);

    let to_point = uniforms.point_position.xyz - in.world_position;
    let dist = length(to_point);
    let range = uniforms.point_position.w;
    let cutoff = clamp(1.0 - pow(dist / range, 4.0), 0.0, 1.0);
    let falloff = cutoff * cutoff / max(dist * dist, 0.01);
    let point = uniforms.point_color.rgb * uniforms.point_color.a * falloff
        * max(dot(n, to_point / max(dist, 0.0001)), 0.0);

    var color = in.color.rgb * (hemi + sun + point);
    color = color * uniforms.fog_color.a;

    let depth = distance(uniforms.camera_pos.xyz, in.world_position);
    let fog = smoothstep(uniforms.fog_range.x, uniforms.fog_range.y, depth);
    color = mix(color, uniforms.fog_color.rgb, fog);

    return vec4<f32>(color, in.color.a);
}
"#;
