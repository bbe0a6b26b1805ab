mod utils;
use utils::*;

gen_tests! {
    enums, {
        constants_page {
            plain_members_take_the_enum_type: {
                input: r#"
                    class Align(IntEnum):
                        LEFT = 0
                        CENTER = 1
                        RIGHT = 2
                "#,
                output: r#"
                    ---
                    title: Constants
                    description: A comprehensive list of constants used in pkg.
                    ---

                    ## Align
                    | Name | Description | Type |
                    | --- | --- | --- |
                    | `LEFT` |  | `Align` |
                    | `CENTER` |  | `Align` |
                    | `RIGHT` |  | `Align` |
                "#
            }
        }
        constants_page {
            documented_members_and_sections_sorted: {
                input: r#"
                    class Scancode(enum.IntEnum):
                        """Physical key positions <US layout>."""
                        S_A: int  # value = 4
                        """The `A` key."""
                        S_B: int  # value = 5
                    class MouseButton(Enum):
                        """Mouse buttons."""
                        LEFT = 1
                        """Primary button."""
                        A = B = 2
                "#,
                output: r#"
                    ---
                    title: Constants
                    description: A comprehensive list of constants used in pkg.
                    ---

                    ## MouseButton
                    Mouse buttons.

                    | Name | Description | Type |
                    | --- | --- | --- |
                    | `LEFT` | Primary button. | `MouseButton` |
                    | `A` |  | `MouseButton` |
                    | `B` |  | `MouseButton` |

                    ## Scancode
                    Physical key positions &lt;US layout&gt;.

                    | Name | Description | Type |
                    | --- | --- | --- |
                    | `S_A` | The `A` key. | `Scancode` |
                    | `S_B` |  | `Scancode` |
                "#
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libstubdoc::{JsonMemberDocs, Renderer, enrich::enrich_enum_member_docs};
    use pretty_assertions::assert_eq;

    const KEYS: &str = r#"
        class Key(IntEnum):
            UP = 0
            DOWN = 1
            """Documented in the stub."""
        class Vec2:
            x: float
    "#;

    #[test]
    fn enum_members_are_typed_as_the_enum() {
        let model = model(KEYS);
        let key = &model.classes["Key"];
        assert!(key.is_enum);
        let members: Vec<_> = key
            .properties
            .iter()
            .map(|p| (p.name.as_str(), p.type_.as_deref()))
            .collect();
        assert_eq!(members, vec![("UP", Some("Key")), ("DOWN", Some("Key"))]);
        assert_eq!(key.properties[0].doc, None);
    }

    #[test]
    fn enums_are_not_plain_classes() {
        let model = model(KEYS);
        let enums: Vec<_> = model.enums().map(|c| c.name.as_str()).collect();
        let plain: Vec<_> = model.plain_classes().map(|c| c.name.as_str()).collect();
        assert_eq!(enums, vec!["Key"]);
        assert_eq!(plain, vec!["Vec2"]);
    }

    #[test]
    fn runtime_docs_fill_undocumented_members() {
        let mut model = model(KEYS);
        let docs = JsonMemberDocs::from_json(
            r#"{"pkg._core": {"Key": {"UP": "Arrow up.", "DOWN": "Never used."}}}"#,
        )
        .unwrap();
        assert_eq!(enrich_enum_member_docs(&mut model, PACKAGE, &docs), 1);

        let config = config();
        let page = Renderer::new(&model, &config).constants_page();
        assert!(page.contains("| `UP` | Arrow up. | `Key` |"));
        assert!(page.contains("| `DOWN` | Documented in the stub. | `Key` |"));
    }

    #[test]
    fn enum_types_link_to_the_constants_page() {
        let page = class_page(
            r#"
            class Key(IntEnum):
                UP = 0
            class Event:
                key: Key | None
            "#,
            "Event",
        );
        assert!(page.contains(
            r#"| `key` |  | <code><a href="/docs/manual/constants#key">Key</a> | None</code> |"#
        ));
    }
}
