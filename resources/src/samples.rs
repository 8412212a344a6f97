//! Built-in CRD documents checked when no input is given.

/// `spec` lacks `bar` and `status` lacks `ready`.
pub const OUT_OF_DATE_CRD: &str = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: mycustomresources.example.com-out-of-date
spec:
  group: example.com
  names:
    kind: MyCustomResource
    listKind: MyCustomResourceList
    plural: mycustomresources
    singular: mycustomresource
  scope: Namespaced
  versions:
  - name: v1
    schema:
      openAPIV3Schema:
        type: object
        properties:
          spec:
            type: object
            properties:
              foo:
                type: string
          status:
            type: object
            properties:
              message:
                type: string
    served: true
    storage: true
"#;

pub const UP_TO_DATE_CRD: &str = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: mycustomresources.example.com-up-to-date
spec:
  group: example.com
  names:
    kind: MyCustomResource
    listKind: MyCustomResourceList
    plural: mycustomresources
    singular: mycustomresource
  scope: Namespaced
  versions:
  - name: v1
    schema:
      openAPIV3Schema:
        type: object
        properties:
          spec:
            type: object
            properties:
              foo:
                type: string
              bar:
                type: integer
                format: int64
          status:
            type: object
            properties:
              message:
                type: string
              ready:
                type: boolean
    served: true
    storage: true
"#;

/// Display name and YAML of each built-in document, in check order.
pub fn builtin() -> [(&'static str, &'static str); 2] {
    [
        ("Out-of-Date CRD", OUT_OF_DATE_CRD),
        ("Up-to-Date CRD", UP_TO_DATE_CRD),
    ]
}
