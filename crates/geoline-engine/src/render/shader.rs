/// A named, versioned WGSL program.
///
/// The `version` must match the `// <name> v<version>` header of the source so
/// a stale edit is caught by tests.
#[derive(Debug, Copy, Clone)]
pub struct ShaderSource {
    pub name: &'static str,
    pub version: u32,
    pub wgsl: &'static str,
    pub vertex_entry: &'static str,
    pub fragment_entry: &'static str,
}

/// Wide-line join program (see `shaders/line_join.wgsl`).
pub const LINE_JOIN_SHADER: ShaderSource = ShaderSource {
    name: "line_join",
    version: 1,
    wgsl: include_str!("shaders/line_join.wgsl"),
    vertex_entry: "vs_main",
    fragment_entry: "fs_main",
};

impl ShaderSource {
    pub fn label(&self) -> String {
        format!("geoline {} v{}", self.name, self.version)
    }

    pub fn create_module(&self, device: &wgpu::Device) -> wgpu::ShaderModule {
        let label = self.label();
        log::debug!("compiling shader {label}");
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&label),
            source: wgpu::ShaderSource::Wgsl(self.wgsl.into()),
        })
    }
}
