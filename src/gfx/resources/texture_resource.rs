//! Texture resource management for wgpu
//!
//! Depth buffers, 2D textures decoded from image files and six-face cube maps.
//! Decoding goes through the `image` crate; every face or texture that fails
//! to decode is reported as a [`TextureError`] carrying the offending path.

use std::path::Path;

use image::RgbaImage;

use crate::error::TextureError;

/// GPU texture resource containing texture, view, and sampler
#[derive(Clone)]
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Colour format for every decoded image. Values are sampled as stored.
pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

impl TextureResource {
    /// Standard depth buffer format used throughout the viewer
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates a depth texture matching the surface configuration
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Creates a repeating, linearly filtered 2D texture from RGBA8 pixels.
    pub fn create_from_rgba_data(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[u8],
        width: u32,
        height: u32,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COLOR_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        write_layer(queue, &texture, 0, data, width, height);

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// 1x1 opaque white texture, bound wherever a real texture is missing.
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self::create_from_rgba_data(device, queue, &[255; 4], 1, 1, "White Texture")
    }

    /// 1x1 white cube map, used when the sky faces failed to load.
    pub fn white_cube(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let white = RgbaImage::from_pixel(1, 1, image::Rgba([255; 4]));
        let mut uploader = GpuCubeUploader::new(device, queue, "White Cube Map");
        for face in 0..CUBE_FACES {
            uploader.upload_face(face, &white);
        }
        // six faces were uploaded, so the texture exists
        uploader
            .finish(device)
            .unwrap_or_else(|| Self::white(device, queue))
    }
}

fn write_layer(
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    layer: u32,
    data: &[u8],
    width: u32,
    height: u32,
) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d {
                x: 0,
                y: 0,
                z: layer,
            },
            aspect: wgpu::TextureAspect::All,
        },
        data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
}

/// Decodes an image file into RGBA8, whatever its channel count.
pub fn decode_rgba(path: &Path) -> Result<RgbaImage, TextureError> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

/// Rejects images the device cannot hold in a single texture.
pub fn check_dimensions(path: &Path, width: u32, height: u32, max: u32) -> Result<(), TextureError> {
    if width > max || height > max {
        return Err(TextureError::TooLarge {
            path: path.to_path_buf(),
            width,
            height,
            max,
        });
    }
    Ok(())
}

/// Loads a 2D texture from an image file.
pub fn load_texture_2d(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    path: &Path,
) -> Result<TextureResource, TextureError> {
    let image = decode_rgba(path)?;
    let (width, height) = image.dimensions();
    check_dimensions(path, width, height, device.limits().max_texture_dimension_2d)?;
    log::debug!("Loaded texture {} ({}x{})", path.display(), width, height);
    Ok(TextureResource::create_from_rgba_data(
        device,
        queue,
        image.as_raw(),
        width,
        height,
        &path.display().to_string(),
    ))
}

/// Like [`load_texture_2d`], but a failure is logged and replaced by a white
/// texture so the frame loop never stops over a bad asset.
pub fn load_texture_2d_or_fallback(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    path: &Path,
) -> TextureResource {
    load_texture_2d(device, queue, path).unwrap_or_else(|err| {
        log::warn!("Texture failed to load at path: {} ({})", path.display(), err);
        TextureResource::white(device, queue)
    })
}

pub const CUBE_FACES: u32 = 6;

/// Destination for decoded cube-map faces, in face order.
pub trait CubeFaceUploader {
    /// Largest face edge the destination accepts.
    fn max_dimension(&self) -> u32 {
        u32::MAX
    }

    fn upload_face(&mut self, face: u32, image: &RgbaImage);
}

/// Decodes and uploads each face in turn.
///
/// Stops at the first face that fails to decode, is too large for the
/// uploader, or does not match the size of the first face, and returns that
/// error; faces after it are neither
/// decoded nor uploaded. Returns the face edge length on success.
pub fn load_cube_map_faces<P: AsRef<Path>>(
    paths: &[P],
    uploader: &mut impl CubeFaceUploader,
) -> Result<u32, TextureError> {
    let mut edge = None;

    for (face, path) in paths.iter().enumerate() {
        let path = path.as_ref();
        let image = decode_rgba(path)?;
        let (width, height) = image.dimensions();
        check_dimensions(path, width, height, uploader.max_dimension())?;
        let expected = *edge.get_or_insert(width);
        if width != expected || height != expected {
            return Err(TextureError::FaceSize {
                path: path.to_path_buf(),
                width,
                height,
                expected,
            });
        }
        uploader.upload_face(face as u32, &image);
    }

    Ok(edge.unwrap_or(0))
}

/// Uploads faces into a cube texture created on the first face.
pub struct GpuCubeUploader<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    label: &'a str,
    texture: Option<wgpu::Texture>,
}

impl<'a> GpuCubeUploader<'a> {
    pub fn new(device: &'a wgpu::Device, queue: &'a wgpu::Queue, label: &'a str) -> Self {
        Self {
            device,
            queue,
            label,
            texture: None,
        }
    }

    /// Wraps the uploaded texture in a cube view and sampler.
    pub fn finish(self, device: &wgpu::Device) -> Option<TextureResource> {
        let texture = self.texture?;
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(self.label),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(self.label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        Some(TextureResource {
            texture,
            view,
            sampler,
        })
    }
}

impl CubeFaceUploader for GpuCubeUploader<'_> {
    fn max_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    fn upload_face(&mut self, face: u32, image: &RgbaImage) {
        let (width, height) = image.dimensions();
        let device = self.device;
        let label = self.label;
        let texture = self.texture.get_or_insert_with(|| {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: CUBE_FACES,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: COLOR_FORMAT,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            })
        });
        write_layer(self.queue, texture, face, image.as_raw(), width, height);
    }
}

/// Loads a cube map from six face images (+X, -X, +Y, -Y, +Z, -Z).
pub fn load_cube_map<P: AsRef<Path>>(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    paths: &[P; 6],
) -> Result<TextureResource, TextureError> {
    let mut uploader = GpuCubeUploader::new(device, queue, "Cube Map");
    let edge = load_cube_map_faces(paths, &mut uploader)?;
    log::debug!("Loaded cube map ({}x{} per face)", edge, edge);
    Ok(uploader
        .finish(device)
        .unwrap_or_else(|| TextureResource::white_cube(device, queue)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[derive(Default)]
    struct CountingUploader {
        faces: Vec<u32>,
        max: Option<u32>,
    }

    impl CubeFaceUploader for CountingUploader {
        fn max_dimension(&self) -> u32 {
            self.max.unwrap_or(u32::MAX)
        }

        fn upload_face(&mut self, face: u32, _image: &RgbaImage) {
            self.faces.push(face);
        }
    }

    fn face_dir(test: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "kickabout-{}-{}",
            test,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_face(dir: &Path, name: &str, edge: u32) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(edge, edge, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn all_faces_upload_in_order() {
        let dir = face_dir("all-faces");
        let paths: Vec<_> = (0..6)
            .map(|i| write_face(&dir, &format!("face{}.png", i), 4))
            .collect();

        let mut uploader = CountingUploader::default();
        let edge = load_cube_map_faces(&paths, &mut uploader).unwrap();

        assert_eq!(edge, 4);
        assert_eq!(uploader.faces, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn invalid_last_face_fails_after_five_uploads() {
        let dir = face_dir("last-face");
        let mut paths: Vec<_> = (0..5)
            .map(|i| write_face(&dir, &format!("face{}.png", i), 2))
            .collect();
        paths.push(dir.join("missing.png"));

        let mut uploader = CountingUploader::default();
        let result = load_cube_map_faces(&paths, &mut uploader);

        assert!(matches!(result, Err(TextureError::Decode { .. })));
        assert_eq!(uploader.faces.len(), 5);
    }

    #[test]
    fn nothing_uploads_after_the_failing_face() {
        let dir = face_dir("middle-face");
        let paths = vec![
            write_face(&dir, "right.png", 2),
            write_face(&dir, "left.png", 2),
            dir.join("bottom-missing.png"),
            write_face(&dir, "top.png", 2),
            write_face(&dir, "front.png", 2),
            write_face(&dir, "back.png", 2),
        ];

        let mut uploader = CountingUploader::default();
        let err = load_cube_map_faces(&paths, &mut uploader).unwrap_err();

        assert_eq!(uploader.faces, vec![0, 1]);
        assert!(err.to_string().contains("bottom-missing.png"));
    }

    #[test]
    fn mismatched_face_size_is_rejected() {
        let dir = face_dir("face-size");
        let paths = vec![write_face(&dir, "a.png", 2), write_face(&dir, "b.png", 4)];

        let mut uploader = CountingUploader::default();
        let result = load_cube_map_faces(&paths, &mut uploader);

        assert!(matches!(
            result,
            Err(TextureError::FaceSize {
                width: 4,
                expected: 2,
                ..
            })
        ));
        assert_eq!(uploader.faces, vec![0]);
    }

    #[test]
    fn missing_texture_reports_path() {
        let err = decode_rgba(Path::new("does/not/exist.jpg")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.jpg"));
    }

    #[test]
    fn oversized_face_is_rejected_before_upload() {
        let dir = face_dir("too-large");
        let paths = vec![
            write_face(&dir, "small.png", 4),
            write_face(&dir, "small2.png", 4),
            write_face(&dir, "huge.png", 16),
        ];

        let mut uploader = CountingUploader {
            max: Some(8),
            ..Default::default()
        };
        let result = load_cube_map_faces(&paths, &mut uploader);

        assert!(matches!(
            result,
            Err(TextureError::TooLarge {
                width: 16,
                height: 16,
                max: 8,
                ..
            })
        ));
        assert_eq!(uploader.faces, vec![0, 1]);
    }

    #[test]
    fn dimensions_within_the_limit_pass() {
        let path = Path::new("street.jpg");
        assert!(check_dimensions(path, 8, 8, 8).is_ok());
        let err = check_dimensions(path, 9, 2, 8).unwrap_err();
        assert!(err.to_string().contains("street.jpg"));
    }
}
