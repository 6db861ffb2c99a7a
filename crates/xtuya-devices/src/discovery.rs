//! Capability discovery: match devices against a descriptor table.

use crate::descriptors::{DescriptorTable, EntityDescription};
use crate::device::SharedDevice;
use crate::manager::DeviceManager;

/// Pair every device with the descriptions it qualifies for.
///
/// A device qualifies for a description when its category has an entry in
/// `table` and the description's DP code is present in the device's live
/// status. Pairs come out in device order, then in the category's display
/// order.
pub fn discover<D, I>(devices: I, table: &DescriptorTable<D>) -> Vec<(SharedDevice, D)>
where
    D: EntityDescription,
    I: IntoIterator<Item = SharedDevice>,
{
    let mut matches = Vec::new();

    for shared in devices {
        let device = shared.read();
        let Some(descriptions) = table.get(&device.category) else {
            tracing::trace!(
                device_id = %device.id,
                category = %device.category,
                "no descriptors for category"
            );
            continue;
        };

        for description in descriptions {
            if device.has_status(description.key()) {
                matches.push((shared.clone(), description.clone()));
            } else {
                tracing::trace!(
                    device_id = %device.id,
                    key = description.key(),
                    "dp not reported, skipping"
                );
            }
        }
    }

    matches
}

/// Resolve `device_ids` through `manager` and run [`discover`].
///
/// Ids the manager does not know are skipped.
pub fn discover_ids<D: EntityDescription>(
    manager: &dyn DeviceManager,
    device_ids: &[String],
    table: &DescriptorTable<D>,
) -> Vec<(SharedDevice, D)> {
    let devices = device_ids.iter().filter_map(|id| {
        let device = manager.device(id);
        if device.is_none() {
            tracing::debug!(device_id = %id, "announced device is unknown to the manager");
        }
        device
    });
    discover(devices, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::NumberDescription;
    use crate::device::Device;

    fn table() -> DescriptorTable<NumberDescription> {
        DescriptorTable::new()
            .with_category(
                "kg",
                [
                    NumberDescription::new("presence_delay"),
                    NumberDescription::new("movesensitivity"),
                ],
            )
            .with_category("mzj", [NumberDescription::new("tempset")])
    }

    #[test]
    fn test_matches_only_reported_codes() {
        let device = Device::new("dev1", "kg")
            .with_status("presence_delay", 10)
            .into_shared();

        let found = discover([device], &table());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].1.key, "presence_delay");
        assert_eq!(found[0].0.read().id, "dev1");
    }

    #[test]
    fn test_unknown_category_yields_nothing() {
        let device = Device::new("dev1", "xyz")
            .with_status("presence_delay", 10)
            .into_shared();
        assert!(discover([device], &table()).is_empty());
    }

    #[test]
    fn test_pairs_follow_display_order() {
        let device = Device::new("dev1", "kg")
            .with_status("movesensitivity", 3)
            .with_status("presence_delay", 10)
            .into_shared();

        let keys: Vec<String> = discover([device], &table())
            .into_iter()
            .map(|(_, d)| d.key)
            .collect();
        assert_eq!(keys, vec!["presence_delay", "movesensitivity"]);
    }

    #[test]
    fn test_multiple_devices_share_descriptions() {
        let a = Device::new("a", "kg").with_status("presence_delay", 1).into_shared();
        let b = Device::new("b", "mzj").with_status("tempset", 500).into_shared();
        let c = Device::new("c", "kg").with_status("presence_delay", 2).into_shared();

        let ids: Vec<String> = discover([a, b, c], &table())
            .into_iter()
            .map(|(device, d)| format!("{}/{}", device.read().id, d.key))
            .collect();
        assert_eq!(ids, vec!["a/presence_delay", "b/tempset", "c/presence_delay"]);
    }
}
