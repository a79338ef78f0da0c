use condition_editor::editor::{
    EditError, EditSession, ExpressionEditor, add_group, add_sibling, delete_node,
    empty_comparison, propagate_child_edit, rewrite_operators,
};
use condition_editor::{
    BooleanOperator, Branch, ComparisonOperator, EditIntent, Expression, NodeKind, NodePath,
    parse_expression, to_json,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn cmp(reference: &str, value: f64) -> Expression {
    Expression::comparison(
        ComparisonOperator::Gt,
        Expression::number_ref(reference),
        Expression::number(value),
    )
}

fn path(s: &str) -> NodePath {
    s.parse().expect("valid path")
}

/// `count > 1 && (avg > 2 || max > 3)`
fn mixed_tree() -> Expression {
    Expression::boolean(
        BooleanOperator::And,
        cmp("count-", 1.0),
        Expression::group(
            BooleanOperator::Or,
            Expression::boolean(BooleanOperator::Or, cmp("avg-x", 2.0), cmp("max-x", 3.0)),
        ),
    )
}

#[test]
fn test_add_sibling_at_root_without_override() {
    let root = parse_expression(&json!({
        "expr": "==",
        "left": { "expr": "number-ref", "ref": "count-" },
        "right": { "expr": "number", "value": 5 }
    }))
    .unwrap();

    let mut editor = ExpressionEditor::default();
    let change = editor
        .apply(&root, &NodePath::root(), &EditIntent::AddExpression)
        .unwrap();

    let next = to_json(&change.conditions.unwrap());
    assert_eq!(next["expr"], "&&");
    assert_eq!(next["left"], to_json(&root));
    assert_eq!(next["right"]["right"], json!({ "expr": "number", "value": 0 }));
    assert_eq!(next["right"], to_json(&empty_comparison()));
}

#[test]
fn test_add_sibling_grows_depth_only_at_edit_site() {
    let root = mixed_tree();
    let at = path("right.child.left");
    let mut editor = ExpressionEditor::default();

    let next = editor
        .apply(&root, &at, &EditIntent::AddExpression)
        .unwrap()
        .conditions
        .unwrap();

    // The edited node moved one level down, under a new boolean
    let inserted = next.get(&at).unwrap();
    assert_eq!(inserted.kind(), NodeKind::Boolean);
    assert_eq!(inserted.branch(Branch::Left), root.get(&at));
    assert_eq!(inserted.depth(), root.get(&at).unwrap().depth() + 1);

    // Everything else is untouched
    assert_eq!(next.get(&path("left")), root.get(&path("left")));
    assert_eq!(
        next.get(&path("right.child.right")),
        root.get(&path("right.child.right"))
    );
    assert_eq!(next.depth(), root.depth() + 1);
}

#[test]
fn test_add_sibling_inside_group_uses_group_operator() {
    let root = Expression::group(BooleanOperator::Or, cmp("count-", 1.0));
    let mut editor = ExpressionEditor::new(Default::default())
        .with_session(EditSession::with_override(BooleanOperator::And));

    let next = editor
        .apply(&root, &path("child"), &EditIntent::AddExpression)
        .unwrap()
        .conditions
        .unwrap();

    assert_eq!(
        next,
        Expression::group(
            BooleanOperator::Or,
            Expression::boolean(BooleanOperator::Or, cmp("count-", 1.0), empty_comparison())
        )
    );
}

#[test]
fn test_add_group_uses_complement_polarity() {
    for (context, expected_group) in [
        (BooleanOperator::And, BooleanOperator::Or),
        (BooleanOperator::Or, BooleanOperator::And),
    ] {
        let root = Expression::boolean(context, cmp("a", 1.0), cmp("b", 2.0));
        let mut editor = ExpressionEditor::default();

        let next = editor
            .apply(&root, &path("left"), &EditIntent::AddGroup)
            .unwrap()
            .conditions
            .unwrap();

        let new_group = next.get(&path("left.right")).unwrap();
        assert_eq!(new_group.kind(), NodeKind::Group);
        assert_eq!(new_group.boolean_operator(), Some(expected_group));
        assert_eq!(
            next.get(&path("left")).unwrap().boolean_operator(),
            Some(context)
        );
    }
}

#[test]
fn test_add_group_at_root_follows_session_override() {
    let mut editor = ExpressionEditor::default()
        .with_session(EditSession::with_override(BooleanOperator::Or));

    let next = editor
        .apply(&cmp("a", 1.0), &NodePath::root(), &EditIntent::AddGroup)
        .unwrap()
        .conditions
        .unwrap();

    assert_eq!(
        next,
        Expression::boolean(
            BooleanOperator::Or,
            cmp("a", 1.0),
            Expression::group(BooleanOperator::And, empty_comparison())
        )
    );
}

#[test]
fn test_delete_root_clears_condition() {
    let mut editor = ExpressionEditor::default();
    let change = editor
        .apply(&cmp("a", 1.0), &NodePath::root(), &EditIntent::Delete)
        .unwrap();
    assert_eq!(change.conditions, None);
    assert_eq!(
        serde_json::to_value(&change).unwrap(),
        json!({ "conditions": null })
    );
}

#[test]
fn test_delete_sole_group_child_removes_group() {
    let root = parse_expression(&json!({
        "expr": "group",
        "operator": "&&",
        "child": {
            "expr": "<",
            "left": { "expr": "number-ref", "ref": "count-" },
            "right": { "expr": "number", "value": 1 }
        }
    }))
    .unwrap();

    let mut editor = ExpressionEditor::default();
    let change = editor
        .apply(&root, &path("child"), &EditIntent::Delete)
        .unwrap();
    assert_eq!(change.conditions, None);
}

#[test]
fn test_delete_in_boolean_collapses_to_sibling() {
    let root = mixed_tree();
    let mut editor = ExpressionEditor::default();

    let next = editor
        .apply(&root, &path("left"), &EditIntent::Delete)
        .unwrap()
        .conditions
        .unwrap();

    assert_eq!(&next, root.get(&path("right")).unwrap());
}

#[test]
fn test_group_replaced_by_inner_group_after_collapse() {
    // group(&&, cmp && group(||, x))  -- deleting cmp leaves group(group(..))
    let inner = Expression::group(BooleanOperator::Or, cmp("x", 1.0));
    let root = Expression::group(
        BooleanOperator::And,
        Expression::boolean(BooleanOperator::And, cmp("a", 1.0), inner.clone()),
    );

    let mut editor = ExpressionEditor::default();
    let next = editor
        .apply(&root, &path("child.left"), &EditIntent::Delete)
        .unwrap()
        .conditions
        .unwrap();

    assert_eq!(next, inner);
}

#[test]
fn test_propagate_child_null_is_always_null() {
    for child in [cmp("a", 1.0), mixed_tree()] {
        let group = Expression::group(BooleanOperator::And, child);
        assert_eq!(propagate_child_edit(Branch::Child, None, &group), Ok(None));
    }
}

#[test]
fn test_propagate_left_right_null_returns_survivor_unchanged() {
    let node = mixed_tree();
    assert_eq!(
        propagate_child_edit(Branch::Left, None, &node),
        Ok(node.branch(Branch::Right).cloned())
    );
    assert_eq!(
        propagate_child_edit(Branch::Right, None, &node),
        Ok(node.branch(Branch::Left).cloned())
    );
}

#[test]
fn test_pure_operations_leave_input_alone() {
    let node = cmp("a", 1.0);
    let before = node.clone();

    let _ = add_sibling(&node, BooleanOperator::And, &empty_comparison());
    let _ = add_group(&node, BooleanOperator::Or, &empty_comparison());
    assert_eq!(delete_node(&node), None);

    assert_eq!(node, before);
}

#[test]
fn test_change_operator_rewrites_whole_tree_and_records_override() {
    let root = mixed_tree();
    let mut editor = ExpressionEditor::default();

    let next = editor
        .apply(
            &root,
            &NodePath::root(),
            &EditIntent::SetBooleanOperator(BooleanOperator::Or),
        )
        .unwrap()
        .conditions
        .unwrap();

    assert_eq!(
        next,
        Expression::boolean(
            BooleanOperator::Or,
            cmp("count-", 1.0),
            Expression::group(
                BooleanOperator::And,
                Expression::boolean(BooleanOperator::And, cmp("avg-x", 2.0), cmp("max-x", 3.0)),
            ),
        )
    );
    assert_eq!(
        editor.session().operator_override(),
        Some(BooleanOperator::Or)
    );
}

#[test]
fn test_change_operator_twice_equals_last_choice() {
    let root = mixed_tree();

    let mut twice = ExpressionEditor::default();
    let first = twice.change_operator(&root, BooleanOperator::Or);
    let second = twice.change_operator(&first, BooleanOperator::And);

    let mut once = ExpressionEditor::default();
    let direct = once.change_operator(&root, BooleanOperator::And);

    assert_eq!(second, direct);
    assert_eq!(direct, rewrite_operators(&root, BooleanOperator::And));
    assert_eq!(twice.session(), once.session());
}

#[test]
fn test_override_survives_matching_root_and_resets_on_mismatch() {
    let mut editor = ExpressionEditor::default();
    let or_tree = editor
        .apply(
            &mixed_tree(),
            &NodePath::root(),
            &EditIntent::SetBooleanOperator(BooleanOperator::Or),
        )
        .unwrap()
        .conditions
        .unwrap();

    // Same tree handed back: override stays
    editor
        .apply(&or_tree, &path("left.right"), &EditIntent::SetValue(9.0))
        .unwrap();
    assert_eq!(
        editor.session().operator_override(),
        Some(BooleanOperator::Or)
    );

    // Tree replaced externally with an AND root: override is dropped
    editor
        .apply(&mixed_tree(), &path("left.right"), &EditIntent::SetValue(9.0))
        .unwrap();
    assert_eq!(editor.session().operator_override(), None);
}

#[test]
fn test_set_group_operator_does_not_touch_session() {
    let root = mixed_tree();
    let mut editor = ExpressionEditor::default();

    let next = editor
        .apply(
            &root,
            &path("right"),
            &EditIntent::SetBooleanOperator(BooleanOperator::And),
        )
        .unwrap()
        .conditions
        .unwrap();

    assert_eq!(
        next.get(&path("right")),
        Some(&Expression::group(
            BooleanOperator::And,
            Expression::boolean(BooleanOperator::And, cmp("avg-x", 2.0), cmp("max-x", 3.0)),
        ))
    );
    assert_eq!(next.boolean_operator(), Some(BooleanOperator::And));
    assert_eq!(editor.session().operator_override(), None);
}

#[test]
fn test_leaf_value_edits() {
    let root = cmp("count-", 1.0);
    let mut editor = ExpressionEditor::default();

    let next = editor
        .apply(
            &root,
            &NodePath::root(),
            &EditIntent::SetComparisonOperator(ComparisonOperator::Lte),
        )
        .unwrap()
        .conditions
        .unwrap();
    assert_eq!(next.to_string(), "count- <= 1");

    let next = editor
        .apply(
            &next,
            &path("left"),
            &EditIntent::SetReference("sum-bytes".to_string()),
        )
        .unwrap()
        .conditions
        .unwrap();
    assert_eq!(next.to_string(), "sum-bytes <= 1");
}

#[test]
fn test_value_edit_on_wrong_kind_is_rejected() {
    let mut editor = ExpressionEditor::default();
    let err = editor
        .apply(&cmp("a", 1.0), &path("left"), &EditIntent::SetValue(3.0))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot set a value on a number-ref node at $.left"
    );
}

#[test]
fn test_non_finite_threshold_is_rejected_and_finite_one_round_trips() {
    let root = cmp("count-", 1.0);
    let mut editor = ExpressionEditor::default();

    for value in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
        let err = editor
            .apply(&root, &path("right"), &EditIntent::SetValue(value))
            .unwrap_err();
        assert!(
            matches!(err, EditError::NonFiniteValue { ref path, .. } if path == "$.right"),
            "{err}"
        );
    }

    let next = editor
        .apply(&root, &path("right"), &EditIntent::SetValue(1e300))
        .unwrap()
        .conditions
        .unwrap();
    assert_eq!(parse_expression(&to_json(&next)).unwrap(), next);
}
