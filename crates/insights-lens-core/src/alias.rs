//! Short type names.
//!
//! A best-effort static table; the engine itself only ever sees canonical
//! names.

const ALIASES: &[(&str, &str)] = &[
    ("cm", "configmap"),
    ("co", "clusteroperator"),
    ("mc", "machineconfig"),
    ("mcp", "machineconfigpool"),
    ("no", "node"),
    ("ns", "namespace"),
    ("po", "pod"),
    ("pv", "persistentvolume"),
    ("pvc", "persistentvolumeclaim"),
    ("sc", "storageclass"),
];

/// Canonical type name for `name`; unknown names are returned as-is.
pub fn unalias(name: &str) -> &str {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_aliases() {
        assert_eq!(unalias("mc"), "machineconfig");
        assert_eq!(unalias("mcp"), "machineconfigpool");
        assert_eq!(unalias("cm"), "configmap");
        assert_eq!(unalias("co"), "clusteroperator");
        assert_eq!(unalias("ns"), "namespace");
        assert_eq!(unalias("pv"), "persistentvolume");
        assert_eq!(unalias("pvc"), "persistentvolumeclaim");
    }

    #[test]
    fn unknown_name_passes_through() {
        assert_eq!(unalias("pod"), "pod");
        assert_eq!(unalias("ingress"), "ingress");
    }
}
