use geoline_engine::coords::LatLng;
use geoline_engine::device::GpuInit;
use geoline_engine::logging::LoggingConfig;
use geoline_engine::projection::Crs;
use winit::dpi::LogicalSize;

/// Studio window and map configuration.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,

    /// Display CRS of the map.
    pub map_crs: Crs,
    /// Initial view center.
    pub center: LatLng,
    /// Initial zoom, in map units per pixel.
    pub units_per_pixel: f32,

    pub gpu: GpuInit,
    pub logging: LoggingConfig,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            title: "geoline studio".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            map_crs: Crs::WEB_MERCATOR,
            center: LatLng::new(38.72, -9.14),
            units_per_pixel: 8.0,
            gpu: GpuInit::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl StudioConfig {
    /// Reads overrides from the environment:
    /// - `GEOLINE_MAP_CRS` (e.g. `EPSG:4326`)
    /// - `GEOLINE_LOG` (an `env_logger` filter)
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(name) = std::env::var("GEOLINE_MAP_CRS") {
            let Ok(crs) = name.parse::<Crs>();
            config.map_crs = crs;
        }
        if let Ok(filter) = std::env::var("GEOLINE_LOG") {
            config.logging = LoggingConfig::with_filter(filter);
        }
        config
    }
}
