use std::ffi::{c_void, CString};
use std::path::Path;
use image::DynamicImage;
use crate::common::{BboxContainer, ColorImage, InferenceDevice, ModelConfig, YoloConfiguration, YoloItem};
use crate::data::{ClassNames, ImageAnalyzer};
use crate::detection_runners::darknet_ffi::{DarknetLibrary, DetectorBackend};
use crate::detection_runners::image_ops::PlanarBuffer;
use crate::detection_runners::native_deps::NativeDependencies;
use crate::{utils, Result, YoloError};

#[derive(Debug, Clone, Copy)]
enum ObjectsCall {
    Detect,
    Track,
}

impl ObjectsCall {
    fn entry(&self) -> &'static str {
        match self {
            ObjectsCall::Detect => "detect_objects",
            ObjectsCall::Track => "track_objects",
        }
    }
}

/// An initialized darknet detector plus its class-name table.
///
/// Every detect/track call fills the same fixed-size result container and maps it to
/// [`YoloItem`]s. The native detector is released when the wrapper drops.
pub struct YoloWrapper<B: DetectorBackend = DarknetLibrary> {
    backend: B,
    class_names: ClassNames,
    graphic_device_name: Option<String>,
    network_width: u32,
    network_height: u32,
    container: BboxContainer,
    planar: PlanarBuffer,
    disposed: bool,
}

impl YoloWrapper<DarknetLibrary> {
    /// Loads the darknet binary from `DARKNET_LIB_DIR` (or the current directory) and
    /// initializes it on CUDA device `gpu`.
    pub fn new(config_file: impl AsRef<Path>, weights_file: impl AsRef<Path>, names_file: impl AsRef<Path>,
               gpu: usize) -> Result<Self> {
        let config = ModelConfig::new(
            config_file.as_ref().to_string_lossy().into_owned(),
            weights_file.as_ref().to_string_lossy().into_owned(),
            names_file.as_ref().to_string_lossy().into_owned(),
            String::new(),
            InferenceDevice::CUDA(gpu),
            0,
            0,
        );
        Self::from_config(&config)
    }

    /// Verifies the model files and native dependencies, then loads and initializes darknet.
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        let configuration = config.configuration();
        check_model_files(&configuration)?;

        let lib_dir = config.lib_dir();
        let dependencies = NativeDependencies::for_current(config.inference_device, lib_dir.clone());
        dependencies.verify()?;

        let backend = DarknetLibrary::load(lib_dir.join(dependencies.platform().darknet_library_name()))?;
        let wrapper = Self::with_backend(backend, &configuration, config.inference_device, config.batch_size.max(1))?;

        if config.width != 0 && config.height != 0
            && (config.width, config.height) != (wrapper.network_width, wrapper.network_height) {
            log::warn!("Configured input {}x{} differs from the network input {}x{}",
                       config.width, config.height, wrapper.network_width, wrapper.network_height);
        }
        Ok(wrapper)
    }
}

impl<B: DetectorBackend> YoloWrapper<B> {
    /// Initializes `backend` with the model files. Used directly with custom backends.
    pub fn with_backend(mut backend: B, configuration: &YoloConfiguration, device: InferenceDevice,
                        batch_size: i32) -> Result<Self> {
        check_model_files(configuration)?;
        let class_names = ClassNames::from_file(&configuration.names_file)?;

        let gpu = device.gpu_index();
        let graphic_device_name = if device.needs_cuda() {
            let count = backend.device_count();
            if count <= 0 {
                return Err(YoloError::NoGraphicDevice);
            }
            if gpu >= count as usize {
                return Err(YoloError::DeviceIndexOutOfRange { index: gpu, count: count as usize });
            }
            let name = backend.device_name(gpu as i32);
            log::info!("Using graphic device {}: {}", gpu, name);
            Some(name)
        } else {
            None
        };

        let config_file = path_to_cstring(&configuration.config_file)?;
        let weights_file = path_to_cstring(&configuration.weights_file)?;
        let code = backend.init(&config_file, &weights_file, gpu as i32, batch_size.max(1));
        check_code("init", code)?;

        let network_width = backend.network_width().max(0) as u32;
        let network_height = backend.network_height().max(0) as u32;
        log::info!("{} initialized, network input {}x{}, {} classes",
                   backend.name(), network_width, network_height, class_names.len());

        Ok(Self {
            backend,
            class_names,
            graphic_device_name,
            network_width,
            network_height,
            container: BboxContainer::default(),
            planar: PlanarBuffer::new(),
            disposed: false,
        })
    }

    pub fn class_names(&self) -> &ClassNames {
        &self.class_names
    }

    pub fn graphic_device_name(&self) -> Option<&str> {
        self.graphic_device_name.as_deref()
    }

    pub fn network_width(&self) -> u32 {
        self.network_width
    }

    pub fn network_height(&self) -> u32 {
        self.network_height
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Lets darknet decode and detect an image file.
    pub fn detect_file(&mut self, path: impl AsRef<Path>) -> Result<Vec<YoloItem>> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(YoloError::FileNotFound(path.to_path_buf()));
        }
        let filename = path_to_cstring(path)?;
        self.container.clear();
        let code = self.backend.detect_image(&filename, &mut self.container);
        check_code("detect_image", code)?;
        Ok(self.items())
    }

    /// Detects an encoded png, jpeg or bmp; darknet decodes it with OpenCV.
    pub fn detect_encoded(&mut self, image_data: &[u8]) -> Result<Vec<YoloItem>> {
        if !ImageAnalyzer::is_valid_image_format(image_data) {
            return Err(YoloError::InvalidImageData("not a png, jpeg or bmp image".to_string()));
        }
        if i32::try_from(image_data.len()).is_err() {
            return Err(YoloError::InvalidImageData(format!("{} bytes exceed the native size limit", image_data.len())));
        }
        self.container.clear();
        match self.backend.detect_mat(image_data, &mut self.container) {
            -1 => Err(YoloError::NoOpenCvSupport(self.backend.name().to_string())),
            code => {
                check_code("detect_mat", code)?;
                Ok(self.items())
            }
        }
    }

    /// Detects on a planar float frame in host memory.
    pub fn detect_planar(&mut self, data: &[f32], width: u32, height: u32, channels: usize) -> Result<Vec<YoloItem>> {
        check_planar_len(data, width, height, channels)?;
        // SAFETY: the length check above guarantees width * height * channels floats.
        unsafe { self.run_objects(ObjectsCall::Detect, data.as_ptr(), width, height, channels) }
    }

    /// Tracks on a planar float frame in host memory; items carry track and frame ids.
    pub fn track_planar(&mut self, data: &[f32], width: u32, height: u32, channels: usize) -> Result<Vec<YoloItem>> {
        check_planar_len(data, width, height, channels)?;
        // SAFETY: see detect_planar.
        unsafe { self.run_objects(ObjectsCall::Track, data.as_ptr(), width, height, channels) }
    }

    /// # Safety
    /// `data` must point to `width * height * channels` planar floats in host memory.
    pub unsafe fn detect_raw(&mut self, data: *const f32, width: u32, height: u32, channels: usize) -> Result<Vec<YoloItem>> {
        self.run_objects(ObjectsCall::Detect, data, width, height, channels)
    }

    /// # Safety
    /// `data` must point to `width * height * channels` planar floats in host memory.
    pub unsafe fn track_raw(&mut self, data: *const f32, width: u32, height: u32, channels: usize) -> Result<Vec<YoloItem>> {
        self.run_objects(ObjectsCall::Track, data, width, height, channels)
    }

    /// Detects on a frame already in GPU memory. The frame must match the network input size,
    /// darknet does not resize device buffers.
    ///
    /// # Safety
    /// `device_ptr` must be a CUDA device pointer to `width * height * channels` planar floats.
    pub unsafe fn detect_cuda(&mut self, device_ptr: *const c_void, width: u32, height: u32, channels: usize) -> Result<Vec<YoloItem>> {
        self.check_network_size(width, height)?;
        let (w, h, c) = native_dims(width, height, channels)?;
        self.container.clear();
        let code = self.backend.detect_objects_cuda(device_ptr, w, h, c, &mut self.container);
        check_code("detect_objects_cuda", code)?;
        Ok(self.items())
    }

    pub fn detect_color_image(&mut self, image: &ColorImage, channels: usize) -> Result<Vec<YoloItem>> {
        let data = self.planar.fill(image, channels)?.as_ptr();
        let (width, height) = image.dimensions();
        // SAFETY: the planar buffer was just filled with width * height * channels floats and is
        // not touched until the call returns.
        unsafe { self.run_objects(ObjectsCall::Detect, data, width, height, channels) }
    }

    pub fn track_color_image(&mut self, image: &ColorImage, channels: usize) -> Result<Vec<YoloItem>> {
        let data = self.planar.fill(image, channels)?.as_ptr();
        let (width, height) = image.dimensions();
        // SAFETY: see detect_color_image.
        unsafe { self.run_objects(ObjectsCall::Track, data, width, height, channels) }
    }

    pub fn detect_dynamic_image(&mut self, image: &DynamicImage) -> Result<Vec<YoloItem>> {
        self.detect_color_image(&ColorImage::from(image), 3)
    }

    /// Fails with `ImageSizeMismatch` unless `width x height` is the network input size.
    pub fn check_network_size(&self, width: u32, height: u32) -> Result<()> {
        if self.network_width == 0 || self.network_height == 0 {
            return Ok(());
        }
        if width != self.network_width || height != self.network_height {
            return Err(YoloError::ImageSizeMismatch {
                width,
                height,
                network_width: self.network_width,
                network_height: self.network_height,
            });
        }
        Ok(())
    }

    /// Releases the native detector. Also runs on drop.
    pub fn dispose(&mut self) {
        if !self.disposed {
            let code = self.backend.dispose();
            log::debug!("{} disposed with code {}", self.backend.name(), code);
            self.disposed = true;
        }
    }

    unsafe fn run_objects(&mut self, call: ObjectsCall, data: *const f32, width: u32, height: u32,
                          channels: usize) -> Result<Vec<YoloItem>> {
        let (w, h, c) = native_dims(width, height, channels)?;
        self.container.clear();
        let code = match call {
            ObjectsCall::Detect => self.backend.detect_objects(data, w, h, c, &mut self.container),
            ObjectsCall::Track => self.backend.track_objects(data, w, h, c, &mut self.container),
        };
        check_code(call.entry(), code)?;
        Ok(self.items())
    }

    fn items(&self) -> Vec<YoloItem> {
        self.container.to_items(&self.class_names)
    }
}

impl<B: DetectorBackend> Drop for YoloWrapper<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Fails with `FileNotFound` for the first of cfg, weights, names that is missing.
pub fn check_model_files(configuration: &YoloConfiguration) -> Result<()> {
    for file in [&configuration.config_file, &configuration.weights_file, &configuration.names_file] {
        if !file.is_file() {
            return Err(YoloError::FileNotFound(file.clone()));
        }
    }
    Ok(())
}

fn check_code(entry: &'static str, code: i32) -> Result<()> {
    if code < 0 {
        return Err(YoloError::NativeCall { entry, code });
    }
    Ok(())
}

fn check_planar_len(data: &[f32], width: u32, height: u32, channels: usize) -> Result<()> {
    let expected = utils::buffer_len(width, height, channels)?;
    if data.len() != expected {
        return Err(YoloError::BufferSizeMismatch { expected, actual: data.len() });
    }
    Ok(())
}

fn native_dims(width: u32, height: u32, channels: usize) -> Result<(i32, i32, i32)> {
    match (i32::try_from(width), i32::try_from(height), i32::try_from(channels)) {
        (Ok(w), Ok(h), Ok(c)) => Ok((w, h, c)),
        _ => Err(YoloError::InvalidImageData(format!("{}x{}x{} exceeds the native size limit", width, height, channels))),
    }
}

fn path_to_cstring(path: &Path) -> Result<CString> {
    Ok(CString::new(path.to_string_lossy().into_owned()).map_err(std::io::Error::from)?)
}
