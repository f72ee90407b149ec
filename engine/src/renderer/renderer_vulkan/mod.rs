use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tracing::{Level, debug, error, info, span, warn};
use vulkano::{
    Validated, Version, VulkanError, VulkanLibrary,
    command_buffer::{
        AutoCommandBufferBuilder, CommandBufferUsage, PrimaryAutoCommandBuffer,
        RenderingAttachmentInfo, RenderingInfo,
        allocator::{StandardCommandBufferAllocator, StandardCommandBufferAllocatorCreateInfo},
    },
    device::{Device, DeviceCreateInfo, DeviceExtensions, DeviceFeatures, Queue, QueueCreateInfo},
    instance::{
        Instance, InstanceCreateFlags, InstanceCreateInfo,
        debug::{
            DebugUtilsMessageSeverity, DebugUtilsMessenger, DebugUtilsMessengerCallback,
            DebugUtilsMessengerCreateInfo,
        },
    },
    render_pass::{AttachmentLoadOp, AttachmentStoreOp},
    swapchain::{Surface, SwapchainPresentInfo},
    sync::{self, GpuFuture},
};
use winit::window::Window as WinitWindow;

use crate::config::RendererOptions;
use crate::renderer::{RenderFrame, Renderer};

mod device;
mod swapchain;

pub use self::device::device_rank;
pub use self::swapchain::{choose_present_mode, choose_surface_format};

use self::device::select_physical_device;
use self::swapchain::VulkanSwapchain;

const VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";

/// Clears the window's swapchain image to the frame colour and presents it.
///
/// Fields drop in declaration order, so the swapchain goes before the device and
/// the instance goes last.
pub struct VulkanRenderer {
    winit_window: Arc<WinitWindow>,
    swapchain: VulkanSwapchain,
    previous_frame_end: Option<Box<dyn GpuFuture>>,
    recreate_swapchain: bool,
    command_buffer_allocator: Arc<StandardCommandBufferAllocator>,
    graphics_queue: Arc<Queue>,
    device: Arc<Device>,
    _surface: Arc<Surface>,
    _debug_callback: Option<DebugUtilsMessenger>,
    _instance: Arc<Instance>,
}

impl VulkanRenderer {
    pub fn new(winit_window: Arc<WinitWindow>, options: &RendererOptions) -> Result<Self> {
        let vk_lib = VulkanLibrary::new().context("No local Vulkan library/DLL")?;
        info!("Loaded Vulkan library (API {:?})", vk_lib.api_version());

        let enable_validation = options.validation && has_validation_layer(&vk_lib);
        if options.validation && !enable_validation {
            warn!("{VALIDATION_LAYER} is not installed; continuing without validation");
        }

        let mut enabled_extensions = Surface::required_extensions(&winit_window)
            .context("Failed to query required surface extensions")?;
        let enabled_layers = if enable_validation {
            enabled_extensions.ext_debug_utils = true;
            info!("Vulkan validation layers enabled");
            vec![VALIDATION_LAYER.to_owned()]
        } else {
            Vec::new()
        };

        let instance = Instance::new(
            vk_lib,
            InstanceCreateInfo {
                enabled_layers,
                flags: InstanceCreateFlags::ENUMERATE_PORTABILITY,
                enabled_extensions,
                ..Default::default()
            },
        )
        .context("Failed to create instance")?;
        info!("Created instance");

        let _debug_callback = if enable_validation {
            Some(create_debug_messenger(instance.clone())?)
        } else {
            None
        };

        let surface = Surface::from_window(instance.clone(), winit_window.clone())
            .context("Failed to create surface from window")?;
        info!("Created surface");

        let mut device_extensions = DeviceExtensions {
            khr_swapchain: true,
            ..DeviceExtensions::empty()
        };
        let (physical_device, queue_family_index) = select_physical_device(
            &instance,
            &surface,
            &device_extensions,
            options.power_preference,
        )?;
        info!(
            "Created adapter: {} (type: {:?})",
            physical_device.properties().device_name,
            physical_device.properties().device_type,
        );

        // Dynamic rendering is core from Vulkan 1.3; older devices need the extension.
        if physical_device.api_version() < Version::V1_3 {
            device_extensions.khr_dynamic_rendering = true;
        }

        let (device, mut queues) = Device::new(
            physical_device,
            DeviceCreateInfo {
                enabled_extensions: device_extensions,
                queue_create_infos: vec![QueueCreateInfo {
                    queue_family_index,
                    ..Default::default()
                }],
                enabled_features: DeviceFeatures {
                    dynamic_rendering: true,
                    ..Default::default()
                },
                ..Default::default()
            },
        )
        .context("Failed to create device")?;
        let graphics_queue = queues.next().context("No queue found")?;
        info!("Created device");

        let swapchain = VulkanSwapchain::new(
            device.clone(),
            surface.clone(),
            winit_window.inner_size().into(),
            options,
        )?;
        info!(
            "Surface configured: {:?} {:?} {:?}",
            swapchain.format(),
            swapchain.extent(),
            swapchain.present_mode()
        );

        let command_buffer_allocator = Arc::new(StandardCommandBufferAllocator::new(
            device.clone(),
            StandardCommandBufferAllocatorCreateInfo::default(),
        ));

        let previous_frame_end = Some(sync::now(device.clone()).boxed());

        Ok(VulkanRenderer {
            winit_window,
            swapchain,
            previous_frame_end,
            recreate_swapchain: false,
            command_buffer_allocator,
            graphics_queue,
            device,
            _surface: surface,
            _debug_callback,
            _instance: instance,
        })
    }

    fn record_clear(
        &self,
        frame: &RenderFrame,
        image_index: u32,
    ) -> Result<Arc<PrimaryAutoCommandBuffer>> {
        let mut builder = AutoCommandBufferBuilder::primary(
            self.command_buffer_allocator.clone(),
            self.graphics_queue.queue_family_index(),
            CommandBufferUsage::OneTimeSubmit,
        )?;

        builder
            .begin_rendering(RenderingInfo {
                render_area_extent: self.swapchain.extent(),
                layer_count: 1,
                color_attachments: vec![Some(RenderingAttachmentInfo {
                    load_op: AttachmentLoadOp::Clear,
                    store_op: AttachmentStoreOp::Store,
                    clear_value: Some(frame.clear_color().to_array().into()),
                    ..RenderingAttachmentInfo::image_view(self.swapchain.image_view(image_index))
                })],
                ..Default::default()
            })
            .with_context(|| "Begin rendering")?;

        // Drawing goes here once there is something to draw.

        builder.end_rendering().with_context(|| "End rendering")?;

        Ok(builder.build()?)
    }

    fn reset_frame_future(&mut self) {
        self.previous_frame_end = Some(sync::now(self.device.clone()).boxed());
    }
}

impl Renderer for VulkanRenderer {
    fn draw_frame(&mut self, frame: &RenderFrame) -> Result<()> {
        let _span_draw_frame = span!(
            Level::INFO,
            "VulkanRenderer::draw_frame",
            FrameIndex = frame.frame_index()
        )
        .entered();

        let window_size = self.winit_window.inner_size();
        if window_size.width == 0 || window_size.height == 0 {
            return Ok(());
        }

        if let Some(previous_frame_end) = self.previous_frame_end.as_mut() {
            previous_frame_end.cleanup_finished();
        }

        if self.recreate_swapchain {
            info!(
                "Recreating swapchain for new window size: {:?}",
                window_size
            );
            self.swapchain
                .recreate(window_size.into())
                .context("Failed to recreate swapchain")?;
            self.recreate_swapchain = false;
        }

        let (image_index, suboptimal, acquire_future) = match self.swapchain.acquire_next_image()
        {
            Ok(r) => r,
            Err(VulkanError::OutOfDate) => {
                self.recreate_swapchain = true;
                return Ok(());
            }
            Err(e) => return Err(anyhow!(e).context("Failed to acquire next image")),
        };

        if suboptimal {
            debug!("Swapchain is suboptimal; recreating next frame");
            self.recreate_swapchain = true;
        }

        let command_buffer = self.record_clear(frame, image_index)?;

        let previous_frame_end = self
            .previous_frame_end
            .take()
            .unwrap_or_else(|| sync::now(self.device.clone()).boxed());

        let future = previous_frame_end
            .join(acquire_future)
            .then_execute(self.graphics_queue.clone(), command_buffer)?
            .then_swapchain_present(
                self.graphics_queue.clone(),
                SwapchainPresentInfo::swapchain_image_index(self.swapchain.handle(), image_index),
            )
            .then_signal_fence_and_flush();

        match future.map_err(Validated::unwrap) {
            Ok(future) => {
                self.previous_frame_end = Some(future.boxed());
                Ok(())
            }
            Err(VulkanError::OutOfDate) => {
                self.recreate_swapchain = true;
                self.reset_frame_future();
                Ok(())
            }
            Err(e) => {
                self.reset_frame_future();
                Err(anyhow!(e).context("Failed to flush frame"))
            }
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        debug!("Window resized to {width}x{height}");
        self.recreate_swapchain = true;
    }
}

impl Drop for VulkanRenderer {
    fn drop(&mut self) {
        if let Some(mut previous_frame_end) = self.previous_frame_end.take() {
            previous_frame_end.cleanup_finished();
        }
        if let Err(err) = unsafe { self.device.wait_idle() } {
            error!("Failed to wait for device idle: {err}");
        }
        info!("Device idle; releasing swapchain, device, surface and instance");
    }
}

fn has_validation_layer(vk_lib: &VulkanLibrary) -> bool {
    match vk_lib.layer_properties() {
        Ok(mut layers) => layers.any(|layer| layer.name() == VALIDATION_LAYER),
        Err(err) => {
            warn!("Failed to enumerate instance layers: {err}");
            false
        }
    }
}

/// Routes messages the driver or validation layer raise outside of any call
/// into the log.
fn create_debug_messenger(instance: Arc<Instance>) -> Result<DebugUtilsMessenger> {
    let callback = unsafe {
        DebugUtilsMessengerCallback::new(|message_severity, message_type, callback_data| {
            if message_severity.intersects(DebugUtilsMessageSeverity::ERROR) {
                error!(
                    "Vulkan Debug - ERROR - {:?}: {}",
                    message_type, callback_data.message
                );
            } else if message_severity.intersects(DebugUtilsMessageSeverity::WARNING) {
                warn!(
                    "Vulkan Debug - WARNING - {:?}: {}",
                    message_type, callback_data.message
                );
            } else {
                debug!(
                    "Vulkan Debug - {:?} - {:?}: {}",
                    message_severity, message_type, callback_data.message
                );
            }
        })
    };

    DebugUtilsMessenger::new(
        instance,
        DebugUtilsMessengerCreateInfo::user_callback(callback),
    )
    .with_context(|| "Failed to create debug callback")
}
