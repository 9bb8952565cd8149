//! Standard types shared by all BSW modules.

/// Version information of a BSW module, filled in by each module's
/// `get_version_info` service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VersionInfo {
    /// Vendor ID of the module implementer.
    pub vendor_id: u16,
    /// AUTOSAR module ID.
    pub module_id: u16,
    /// Software major version.
    pub sw_major_version: u8,
    /// Software minor version.
    pub sw_minor_version: u8,
    /// Software patch version.
    pub sw_patch_version: u8,
}
