//! Program linking and reflection.
//!
//! Both stages are parsed and validated with naga once, and every name the
//! renderer needs (vertex attributes, uniform members) is resolved into an
//! immutable [`ProgramInfo`]. Nothing is looked up by name at draw time.

use glam::Mat3;
use naga::valid::{Capabilities, ValidationFlags, Validator};

use super::{ShaderError, ShaderSources, ShaderStage};

pub const VERTEX_ENTRY_POINT: &str = "vs_main";
pub const FRAGMENT_ENTRY_POINT: &str = "fs_main";

pub const PREV_PACK_ATTRIBUTE: &str = "a_prev_pack";
pub const CURRENT_PACK_ATTRIBUTE: &str = "a_current_pack";
pub const NEXT_PACK_ATTRIBUTE: &str = "a_next_pack";

const CAM_MATRIX_MEMBER: &str = "cam_matrix";
const THICKNESS_MEMBER: &str = "thickness";
const COLOR_MEMBER: &str = "color";
const RENDER_WIREFRAME_MEMBER: &str = "render_wireframe";

/// Column stride of a `mat3x3<f32>` in a uniform buffer.
const MAT3_COLUMN_STRIDE: usize = 16;

/// Shader locations of the three strided views over the vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSlots {
    pub prev: u32,
    pub current: u32,
    pub next: u32,
}

/// Byte layout of the line uniform block, as declared by the shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformLayout {
    pub group: u32,
    pub binding: u32,
    pub size: u32,
    pub cam_matrix: u32,
    pub thickness: u32,
    pub color: u32,
    pub render_wireframe: u32,
}

/// Values written to the uniform block for one draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineUniforms {
    pub transform: Mat3,
    pub thickness: f32,
    pub color: [f32; 3],
    pub wireframe: bool,
}

impl UniformLayout {
    /// Serialize `uniforms` at the reflected member offsets.
    pub fn pack(&self, uniforms: &LineUniforms) -> Vec<u8> {
        let mut bytes = vec![0u8; self.size as usize];

        let matrix = self.cam_matrix as usize;
        for (i, column) in uniforms.transform.to_cols_array_2d().iter().enumerate() {
            write_f32s(&mut bytes, matrix + i * MAT3_COLUMN_STRIDE, column);
        }
        write_f32s(&mut bytes, self.thickness as usize, &[uniforms.thickness]);
        write_f32s(&mut bytes, self.color as usize, &uniforms.color);

        let flag = self.render_wireframe as usize;
        bytes[flag..flag + 4].copy_from_slice(&u32::from(uniforms.wireframe).to_le_bytes());

        bytes
    }
}

fn write_f32s(bytes: &mut [u8], offset: usize, values: &[f32]) {
    for (i, value) in values.iter().enumerate() {
        let at = offset + i * 4;
        bytes[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }
}

/// Everything resolved from the shader at link time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramInfo {
    pub attributes: AttributeSlots,
    pub uniforms: UniformLayout,
}

/// Validated shader sources together with their resolved descriptor.
#[derive(Debug, Clone)]
pub struct LinkedProgram {
    sources: ShaderSources,
    info: ProgramInfo,
}

impl LinkedProgram {
    /// Parse, validate and reflect both stages.
    pub fn link(sources: ShaderSources) -> Result<Self, ShaderError> {
        let vertex = parse_and_validate(ShaderStage::Vertex, &sources.vertex)?;
        let fragment = parse_and_validate(ShaderStage::Fragment, &sources.fragment)?;

        let vertex_entry = find_entry_point(&vertex, ShaderStage::Vertex)?;
        find_entry_point(&fragment, ShaderStage::Fragment)?;

        let attributes = AttributeSlots {
            prev: find_attribute(&vertex, vertex_entry, PREV_PACK_ATTRIBUTE)?,
            current: find_attribute(&vertex, vertex_entry, CURRENT_PACK_ATTRIBUTE)?,
            next: find_attribute(&vertex, vertex_entry, NEXT_PACK_ATTRIBUTE)?,
        };

        let uniforms = reflect_uniforms(&vertex, ShaderStage::Vertex)?;
        if reflect_uniforms(&fragment, ShaderStage::Fragment)? != uniforms {
            return Err(ShaderError::UniformMismatch);
        }

        log::debug!(
            "Linked line program: attributes {:?}, uniforms {:?}",
            attributes,
            uniforms
        );

        Ok(Self {
            sources,
            info: ProgramInfo {
                attributes,
                uniforms,
            },
        })
    }

    pub fn sources(&self) -> &ShaderSources {
        &self.sources
    }

    pub fn info(&self) -> &ProgramInfo {
        &self.info
    }
}

fn parse_and_validate(stage: ShaderStage, source: &str) -> Result<naga::Module, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Parse {
        stage,
        message: e.emit_to_string(source),
    })?;

    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|e| ShaderError::Validation {
            stage,
            message: e.into_inner().to_string(),
        })?;

    Ok(module)
}

fn find_entry_point(
    module: &naga::Module,
    stage: ShaderStage,
) -> Result<&naga::EntryPoint, ShaderError> {
    let (name, naga_stage) = match stage {
        ShaderStage::Vertex => (VERTEX_ENTRY_POINT, naga::ShaderStage::Vertex),
        ShaderStage::Fragment => (FRAGMENT_ENTRY_POINT, naga::ShaderStage::Fragment),
    };
    module
        .entry_points
        .iter()
        .find(|ep| ep.name == name && ep.stage == naga_stage)
        .ok_or(ShaderError::MissingEntryPoint { stage, name })
}

fn is_vec3_f32(module: &naga::Module, ty: naga::Handle<naga::Type>) -> bool {
    matches!(
        module.types[ty].inner,
        naga::TypeInner::Vector { size: naga::VectorSize::Tri, scalar } if scalar == naga::Scalar::F32
    )
}

fn find_attribute(
    module: &naga::Module,
    entry: &naga::EntryPoint,
    name: &'static str,
) -> Result<u32, ShaderError> {
    // Inputs are either plain arguments or members of a struct argument.
    let mut inputs: Vec<(Option<&str>, naga::Handle<naga::Type>, Option<&naga::Binding>)> =
        Vec::new();
    for arg in &entry.function.arguments {
        match (&arg.binding, &module.types[arg.ty].inner) {
            (None, naga::TypeInner::Struct { members, .. }) => {
                inputs.extend(
                    members
                        .iter()
                        .map(|m| (m.name.as_deref(), m.ty, m.binding.as_ref())),
                );
            }
            (binding, _) => inputs.push((arg.name.as_deref(), arg.ty, binding.as_ref())),
        }
    }

    let (_, ty, binding) = inputs
        .into_iter()
        .find(|(input_name, _, _)| *input_name == Some(name))
        .ok_or(ShaderError::MissingAttribute(name))?;

    match binding {
        Some(naga::Binding::Location { location, .. }) if is_vec3_f32(module, ty) => {
            Ok(*location)
        }
        _ => Err(ShaderError::AttributeType(name)),
    }
}

fn reflect_uniforms(
    module: &naga::Module,
    stage: ShaderStage,
) -> Result<UniformLayout, ShaderError> {
    let (binding, ty) = module
        .global_variables
        .iter()
        .find_map(|(_, var)| match (var.space, &var.binding) {
            (naga::AddressSpace::Uniform, Some(binding)) => Some((binding.clone(), var.ty)),
            _ => None,
        })
        .ok_or(ShaderError::MissingUniformBlock { stage })?;

    let naga::TypeInner::Struct { members, span } = &module.types[ty].inner else {
        return Err(ShaderError::MissingUniformBlock { stage });
    };

    let member_offset = |name: &'static str| -> Result<u32, ShaderError> {
        let member = members
            .iter()
            .find(|m| m.name.as_deref() == Some(name))
            .ok_or(ShaderError::UniformMember {
                stage,
                member: name,
            })?;

        let inner = &module.types[member.ty].inner;
        let well_typed = match name {
            CAM_MATRIX_MEMBER => matches!(
                inner,
                naga::TypeInner::Matrix {
                    columns: naga::VectorSize::Tri,
                    rows: naga::VectorSize::Tri,
                    scalar,
                } if *scalar == naga::Scalar::F32
            ),
            THICKNESS_MEMBER => *inner == naga::TypeInner::Scalar(naga::Scalar::F32),
            COLOR_MEMBER => is_vec3_f32(module, member.ty),
            RENDER_WIREFRAME_MEMBER => *inner == naga::TypeInner::Scalar(naga::Scalar::U32),
            _ => false,
        };

        if well_typed {
            Ok(member.offset)
        } else {
            Err(ShaderError::UniformMember {
                stage,
                member: name,
            })
        }
    };

    Ok(UniformLayout {
        group: binding.group,
        binding: binding.binding,
        size: *span,
        cam_matrix: member_offset(CAM_MATRIX_MEMBER)?,
        thickness: member_offset(THICKNESS_MEMBER)?,
        color: member_offset(COLOR_MEMBER)?,
        render_wireframe: member_offset(RENDER_WIREFRAME_MEMBER)?,
    })
}
