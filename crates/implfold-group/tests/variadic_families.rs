use expect_test::expect;
use implfold_group::{cluster, Group, MemberKind};

/// One line per group: member count, then the representative or `<unparsed>`.
fn summary(groups: &[Group]) -> String {
    groups
        .iter()
        .map(|group| {
            let representative = group
                .representative()
                .map_or("<unparsed>", |member| member.text.as_str());
            format!("{} | {}\n", group.members().len(), representative)
        })
        .collect()
}

#[test]
fn test_fn_pointer_impls_fold_by_arity_and_abi() {
    let groups = cluster([
        "impl<Ret> PartialEq for fn() -> Ret",
        "impl<Ret, A> PartialEq for fn(A) -> Ret",
        "impl<Ret, A> PartialEq for extern \"C\" fn(A) -> Ret",
        "impl<Ret, A, B> PartialEq for fn(A, B) -> Ret",
        "impl<Ret, A, B> PartialEq for extern \"C\" fn(A, B) -> Ret",
    ])
    .unwrap();
    expect![[r#"
        1 | impl<Ret> PartialEq for fn() -> Ret
        2 | impl<Ret, A, B> PartialEq for fn(A, B) -> Ret
        2 | impl<Ret, A, B> PartialEq for extern "C" fn(A, B) -> Ret
    "#]]
    .assert_eq(&summary(&groups));
}

#[test]
fn test_renamed_and_rebounded_duplicates_share_a_group() {
    let groups = cluster([
        "impl<X: Clone> Clone for Pair<X, X>",
        "impl<Y> Clone for Pair<Y, Y> where Y: Clone",
        "impl<T> Clone for Single<T>",
    ])
    .unwrap();
    expect![[r#"
        2 | impl<X: Clone> Clone for Pair<X, X>
        1 | impl<T> Clone for Single<T>
    "#]]
    .assert_eq(&summary(&groups));
}

#[test]
fn test_arrival_order_is_preserved_in_members() {
    let groups = cluster([
        "impl<A, B> Hash for (A, B)",
        "garbage",
        "impl<A> Hash for (A,)",
        "impl<A, B, C> Hash for (A, B, C)",
    ])
    .unwrap();
    expect![[r#"
        3 | impl<A, B, C> Hash for (A, B, C)
        1 | <unparsed>
    "#]]
    .assert_eq(&summary(&groups));
    let indices: Vec<usize> = groups[0].members().iter().map(|member| member.index).collect();
    assert_eq!(indices, [0, 2, 3]);
    assert!(matches!(groups[1].members()[0].kind, MemberKind::Unparsed(_)));
}
