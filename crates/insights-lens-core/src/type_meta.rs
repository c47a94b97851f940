//! `kind` / `apiVersion` of record types whose schema is known in advance.
//!
//! Used as normalizer overrides so that stripped payloads get their real
//! type metadata instead of the placeholder. ConfigMaps are deliberately
//! absent: their key files are reconstructed, not normalized.

use crate::models::TypeMeta;
use crate::pattern::singular;

const KNOWN_TYPES: &[(&str, &str, &str)] = &[
    ("clusteroperator", "ClusterOperator", "config.openshift.io/v1"),
    ("event", "Event", "v1"),
    ("hostsubnet", "HostSubnet", "network.openshift.io/v1"),
    ("machineconfig", "MachineConfig", "machineconfiguration.openshift.io/v1"),
    ("machineconfigpool", "MachineConfigPool", "machineconfiguration.openshift.io/v1"),
    ("namespace", "Namespace", "v1"),
    ("node", "Node", "v1"),
    ("persistentvolume", "PersistentVolume", "v1"),
    ("persistentvolumeclaim", "PersistentVolumeClaim", "v1"),
    ("pod", "Pod", "v1"),
    ("storageclass", "StorageClass", "storage.k8s.io/v1"),
];

/// Known type metadata for a (singular or plural) type name.
pub fn known_type_meta(resource_type: &str) -> Option<TypeMeta<'static>> {
    let stem = singular(resource_type);
    KNOWN_TYPES
        .iter()
        .find(|(name, _, _)| *name == stem)
        .map(|&(_, kind, api_version)| TypeMeta::new(kind, api_version))
}
