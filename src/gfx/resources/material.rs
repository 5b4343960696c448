//! Material system for the baked workbench look.
//!
//! The scene renders unlit: every material is a flat base color standing in
//! for a pre-baked texture, optionally with an emissive term (the sunray
//! planes) or transparency (glass, sunrays). Materials are stored centrally
//! in [`MaterialManager`] under fixed symbolic names and objects reference
//! them by id, so the classifier can hand out assignments without ever
//! creating a material itself.

use std::collections::HashMap;

use wgpu::Device;

use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

/// Material ID for referencing materials
pub type MaterialId = String;

/// GPU uniform data for materials
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub emissive: [f32; 3],
    _padding: f32,
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Material bind group management
pub struct MaterialBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl MaterialBindings {
    pub fn new(device: &Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .create(device, "Material Bind Group");

        MaterialBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    pub fn create_bind_group(&mut self, device: &Device, ubo: &MaterialUBO) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Material Bind Group"),
        );
    }

    pub fn bind_group_layouts(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }
}

/// An unlit scene material.
///
/// GPU resources are created lazily and shared by every object that
/// references the material.
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub emissive: [f32; 3],

    material_ubo: Option<MaterialUBO>,
    material_bindings: Option<MaterialBindings>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            base_color: [0.8, 0.8, 0.8, 1.0],
            emissive: [0.0, 0.0, 0.0],
            material_ubo: None,
            material_bindings: None,
        }
    }
}

impl Material {
    pub fn new(name: &str, base_color: [f32; 4]) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            emissive: [0.0, 0.0, 0.0],
            material_ubo: None,
            material_bindings: None,
        }
    }

    /// Builder pattern: Set emissive color
    pub fn with_emission(mut self, r: f32, g: f32, b: f32) -> Self {
        self.emissive = [r, g, b];
        self
    }

    /// Transparent materials render in the second pass, without depth writes.
    pub fn is_transparent(&self) -> bool {
        self.base_color[3] < 1.0
    }

    /// Updates GPU resources for this material
    pub fn update_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        if self.material_ubo.is_none() {
            self.material_ubo = Some(MaterialUBO::new(device));
        }

        if self.material_bindings.is_none() {
            let mut bindings = MaterialBindings::new(device);
            if let Some(ubo) = &self.material_ubo {
                bindings.create_bind_group(device, ubo);
            }
            self.material_bindings = Some(bindings);
        }

        let uniform_data = MaterialUniform {
            base_color: self.base_color,
            emissive: self.emissive,
            _padding: 0.0,
        };

        if let Some(ubo) = &mut self.material_ubo {
            ubo.update_content(queue, uniform_data);
        }
    }

    /// Gets the bind group for rendering
    pub fn get_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.material_bindings
            .as_ref()
            .and_then(|bindings| bindings.bind_group.as_ref())
    }

    /// Gets the bind group layout for pipeline creation
    pub fn get_bind_group_layout(&self) -> Option<&wgpu::BindGroupLayout> {
        self.material_bindings
            .as_ref()
            .map(|b| b.bind_group_layouts())
    }
}

/// The fixed workbench material set, keyed by the symbolic names the
/// classifier resolves to.
///
/// The five baked entries stand in for the pre-baked scene textures; glass
/// and sunrays are the transparent specials, the picture is the framed print.
pub fn workbench_materials() -> Vec<Material> {
    vec![
        Material::new("glass", [0.98, 0.95, 0.78, 0.25]),
        Material::new("sunrays", [0.914, 0.906, 0.584, 0.15]).with_emission(0.933, 0.796, 0.667),
        Material::new("picture", [0.72, 0.58, 0.48, 1.0]),
        Material::new("baked_one", [0.69, 0.52, 0.38, 1.0]),
        Material::new("baked_two", [0.55, 0.43, 0.34, 1.0]),
        Material::new("baked_three", [0.78, 0.70, 0.60, 1.0]),
        Material::new("baked_four", [0.46, 0.40, 0.37, 1.0]),
        Material::new("baked_five", [0.61, 0.58, 0.50, 1.0]),
    ]
}

/// Manages all materials in the engine
///
/// Centralized storage for all materials. Objects reference materials by ID
/// rather than storing material data directly, enabling efficient sharing
/// of GPU resources between objects.
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
    default_material_id: MaterialId,
}

impl MaterialManager {
    /// Creates a new material manager with a default material
    pub fn new() -> Self {
        let mut manager = Self {
            materials: HashMap::new(),
            default_material_id: "default".to_string(),
        };

        manager
            .materials
            .insert("default".to_string(), Material::default());

        manager
    }

    /// Adds a material to the library
    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    /// Gets a material by ID
    pub fn get_material(&self, id: &MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    /// Gets the default material
    pub fn get_default_material(&self) -> &Material {
        self.materials
            .get(&self.default_material_id)
            .expect("default material is registered at construction")
    }

    /// Gets material for an object with fallback to default
    ///
    /// Main lookup used during rendering; handles objects with no assignment
    /// and assignments whose material does not exist.
    pub fn get_material_for_object(&self, material_id: Option<&MaterialId>) -> &Material {
        match material_id {
            Some(id) => self
                .get_material(id)
                .unwrap_or_else(|| self.get_default_material()),
            None => self.get_default_material(),
        }
    }

    /// Lists all material IDs
    pub fn list_materials(&self) -> Vec<&MaterialId> {
        self.materials.keys().collect()
    }

    /// Updates GPU resources for all materials
    pub fn update_all_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        for material in self.materials.values_mut() {
            material.update_gpu_resources(device, queue);
        }
    }
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workbench_set_covers_the_symbolic_names() {
        let mut manager = MaterialManager::new();
        for material in workbench_materials() {
            manager.add_material(material);
        }

        for id in [
            "glass",
            "sunrays",
            "picture",
            "baked_one",
            "baked_two",
            "baked_three",
            "baked_four",
            "baked_five",
        ] {
            assert!(manager.get_material(&id.to_string()).is_some(), "{id}");
        }
    }

    #[test]
    fn transparency_follows_alpha() {
        let materials = workbench_materials();
        let glass = materials.iter().find(|m| m.name == "glass").unwrap();
        let baked = materials.iter().find(|m| m.name == "baked_one").unwrap();
        assert!(glass.is_transparent());
        assert!(!baked.is_transparent());
    }

    #[test]
    fn unknown_ids_fall_back_to_the_default_material() {
        let manager = MaterialManager::new();
        let material = manager.get_material_for_object(Some(&"missing".to_string()));
        assert_eq!(material.name, "default");
    }
}
