/// WGSL shader for matcap-shaded road segments with exp2 fog.
pub const ROAD_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
    // rgb = fog color, a = fog density
    fog: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(1) @binding(0)
var matcap_texture: texture_2d<f32>;
@group(1) @binding(1)
var matcap_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) normal_0: vec4<f32>,
    @location(7) normal_1: vec4<f32>,
    @location(8) normal_2: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) view_position: vec3<f32>,
    @location(1) view_normal: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let normal_matrix = mat3x3<f32>(
        instance.normal_0.xyz,
        instance.normal_1.xyz,
        instance.normal_2.xyz,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let view_pos = uniforms.view * world_pos;
    let world_normal = normal_matrix * vertex.normal;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.view_position = view_pos.xyz;
    out.view_normal = (uniforms.view * vec4<f32>(world_normal, 0.0)).xyz;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let normal = normalize(in.view_normal);
    let view_dir = normalize(-in.view_position);
    let x = normalize(vec3<f32>(view_dir.z, 0.0, -view_dir.x));
    let y = cross(view_dir, x);
    let uv = vec2<f32>(dot(x, normal), dot(y, normal)) * 0.495 + 0.5;
    let base = textureSample(matcap_texture, matcap_sampler, vec2<f32>(uv.x, 1.0 - uv.y));

    let depth = -in.view_position.z;
    let density = uniforms.fog.a;
    let fog_factor = clamp(1.0 - exp(-density * density * depth * depth), 0.0, 1.0);
    return vec4<f32>(mix(base.rgb, uniforms.fog.rgb, fog_factor), 1.0);
}
"#;
