use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use vulkano::image::view::ImageView;
use vulkano::{
    Validated, VulkanError,
    device::Device,
    format::Format,
    image::{Image, ImageUsage},
    swapchain::{
        ColorSpace, PresentMode, Surface, Swapchain, SwapchainAcquireFuture, SwapchainCreateInfo,
        acquire_next_image,
    },
};

use crate::config::RendererOptions;

pub struct VulkanSwapchain {
    swapchain: Arc<Swapchain>,
    image_views: Vec<Arc<ImageView>>,
}

impl VulkanSwapchain {
    pub fn new(
        device: Arc<Device>,
        surface: Arc<Surface>,
        window_size: [u32; 2],
        options: &RendererOptions,
    ) -> Result<Self> {
        let physical_device = device.physical_device().clone();

        // We can only pass values that are allowed by the surface capabilities.
        let capabilities = physical_device
            .surface_capabilities(&surface, Default::default())
            .context("Failed to query surface capabilities")?;

        let formats = physical_device
            .surface_formats(&surface, Default::default())
            .context("Failed to query surface formats")?;
        let (image_format, image_color_space) =
            choose_surface_format(&formats, options.preferred_format)
                .ok_or_else(|| anyhow!("Surface reports no formats"))?;

        let present_modes: Vec<PresentMode> = physical_device
            .surface_present_modes(&surface, Default::default())
            .context("Failed to query present modes")?
            .into_iter()
            .collect();
        let present_mode = choose_present_mode(&present_modes, options.present_mode);

        let min_image_count = capabilities.min_image_count.max(2);
        let min_image_count = capabilities
            .max_image_count
            .map_or(min_image_count, |max| min_image_count.min(max));

        let (swapchain, images) = Swapchain::new(
            device,
            surface,
            SwapchainCreateInfo {
                min_image_count,
                image_format,
                image_color_space,
                image_extent: window_size,
                image_usage: ImageUsage::COLOR_ATTACHMENT,
                present_mode,
                composite_alpha: capabilities
                    .supported_composite_alpha
                    .into_iter()
                    .next()
                    .ok_or_else(|| anyhow!("No supported composite alpha"))?,
                ..Default::default()
            },
        )
        .context("Failed to create swapchain")?;

        let image_views = VulkanSwapchain::create_image_views(&images)?;

        Ok(VulkanSwapchain {
            swapchain,
            image_views,
        })
    }

    pub fn recreate(&mut self, window_size: [u32; 2]) -> Result<()> {
        let (new_swapchain, new_images) = self.swapchain.recreate(SwapchainCreateInfo {
            image_extent: window_size,
            ..self.swapchain.create_info()
        })?;
        self.swapchain = new_swapchain;
        self.image_views = VulkanSwapchain::create_image_views(&new_images)?;
        Ok(())
    }

    pub fn acquire_next_image(&self) -> Result<(u32, bool, SwapchainAcquireFuture), VulkanError> {
        acquire_next_image(self.swapchain.clone(), None).map_err(Validated::unwrap)
    }

    pub fn handle(&self) -> Arc<Swapchain> {
        self.swapchain.clone()
    }

    pub fn image_view(&self, image_index: u32) -> Arc<ImageView> {
        self.image_views[image_index as usize].clone()
    }

    pub fn format(&self) -> Format {
        self.swapchain.image_format()
    }

    pub fn extent(&self) -> [u32; 2] {
        self.swapchain.image_extent()
    }

    pub fn present_mode(&self) -> PresentMode {
        self.swapchain.present_mode()
    }

    fn create_image_views(images: &[Arc<Image>]) -> Result<Vec<Arc<ImageView>>> {
        images
            .iter()
            .map(|image| {
                ImageView::new_default(image.clone())
                    .map_err(|e| anyhow!("Failed to create image view: {:?}", e))
            })
            .collect()
    }
}

/// Returns `preferred` when the surface offers it, otherwise the first offered format.
pub fn choose_surface_format(
    formats: &[(Format, ColorSpace)],
    preferred: Format,
) -> Option<(Format, ColorSpace)> {
    formats
        .iter()
        .find(|(format, color_space)| {
            *format == preferred && *color_space == ColorSpace::SrgbNonLinear
        })
        .or_else(|| formats.iter().find(|(format, _)| *format == preferred))
        .or_else(|| formats.first())
        .copied()
}

/// FIFO is guaranteed to be available, so it is the fallback.
pub fn choose_present_mode(available: &[PresentMode], requested: PresentMode) -> PresentMode {
    if available.contains(&requested) {
        requested
    } else {
        PresentMode::Fifo
    }
}
