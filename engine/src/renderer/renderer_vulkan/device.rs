use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tracing::info;
use vulkano::{
    Version,
    device::{
        DeviceExtensions, QueueFlags,
        physical::{PhysicalDevice, PhysicalDeviceType},
    },
    instance::Instance,
    swapchain::Surface,
};

use crate::config::PowerPreference;

/// Lower is better.
pub fn device_rank(device_type: PhysicalDeviceType, preference: PowerPreference) -> u8 {
    match (preference, device_type) {
        (PowerPreference::HighPerformance, PhysicalDeviceType::DiscreteGpu) => 0,
        (PowerPreference::HighPerformance, PhysicalDeviceType::IntegratedGpu) => 1,
        (PowerPreference::LowPower, PhysicalDeviceType::IntegratedGpu) => 0,
        (PowerPreference::LowPower, PhysicalDeviceType::DiscreteGpu) => 1,
        (_, PhysicalDeviceType::VirtualGpu) => 2,
        (_, PhysicalDeviceType::Cpu) => 3,
        (_, PhysicalDeviceType::Other) => 4,
        _ => 5,
    }
}

/// Picks the best device that can render to `surface`, along with the index of a
/// queue family supporting both graphics and presentation.
pub fn select_physical_device(
    instance: &Arc<Instance>,
    surface: &Surface,
    device_extensions: &DeviceExtensions,
    preference: PowerPreference,
) -> Result<(Arc<PhysicalDevice>, u32)> {
    instance
        .enumerate_physical_devices()
        .context("Could not enumerate physical devices")?
        .filter(|p| {
            p.api_version() >= Version::V1_3 || p.supported_extensions().khr_dynamic_rendering
        })
        .filter(|p| p.supported_extensions().contains(device_extensions))
        .filter_map(|p| {
            info!(
                "Found device: {} (type: {:?})",
                p.properties().device_name,
                p.properties().device_type
            );
            p.queue_family_properties()
                .iter()
                .enumerate()
                .position(|(i, q)| {
                    q.queue_flags.intersects(QueueFlags::GRAPHICS)
                        && p.surface_support(i as u32, surface).unwrap_or(false)
                })
                .map(|i| (p, i as u32))
        })
        .min_by_key(|(p, _)| device_rank(p.properties().device_type, preference))
        .ok_or_else(|| anyhow!("No suitable physical device found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_performance_prefers_discrete() {
        let pref = PowerPreference::HighPerformance;
        assert!(
            device_rank(PhysicalDeviceType::DiscreteGpu, pref)
                < device_rank(PhysicalDeviceType::IntegratedGpu, pref)
        );
    }

    #[test]
    fn low_power_prefers_integrated() {
        let pref = PowerPreference::LowPower;
        assert!(
            device_rank(PhysicalDeviceType::IntegratedGpu, pref)
                < device_rank(PhysicalDeviceType::DiscreteGpu, pref)
        );
    }

    #[test]
    fn software_devices_rank_last() {
        for pref in [PowerPreference::HighPerformance, PowerPreference::LowPower] {
            let virtual_gpu = device_rank(PhysicalDeviceType::VirtualGpu, pref);
            let cpu = device_rank(PhysicalDeviceType::Cpu, pref);
            assert!(device_rank(PhysicalDeviceType::IntegratedGpu, pref) < virtual_gpu);
            assert!(device_rank(PhysicalDeviceType::DiscreteGpu, pref) < virtual_gpu);
            assert!(virtual_gpu < cpu);
            assert!(cpu < device_rank(PhysicalDeviceType::Other, pref));
        }
    }
}
