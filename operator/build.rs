use std::path::Path;

use kube::CustomResourceExt;
use resources::MyCustomResource;

/// Keeps `crds/<crd name>.yaml` in sync with the reference resource type.
fn main() {
    println!("cargo:rerun-if-changed=../resources/src/lib.rs");

    let manifest = serde_yaml::to_string(&MyCustomResource::crd()).expect("Failed to serialize CRD");
    let dir = Path::new("crds");
    let path = dir.join(format!("{}.yaml", MyCustomResource::crd_name()));

    let stale = std::fs::read_to_string(&path)
        .map(|existing| existing != manifest)
        .unwrap_or(true);
    if stale {
        std::fs::create_dir_all(dir).expect("Failed to create crds directory");
        std::fs::write(&path, manifest).expect("Failed to write CRD file");
    }
}
