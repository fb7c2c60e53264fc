use super::node::Node;

/// ```latex
/// U(s, a) = c P(s, a) \frac{\sqrt{\sum_b N(s, b)}}{1 + N(s, a)}
/// ```
fn exploration(c: f32, policy: f32, sum_of_action_visits: f32, action_visits: f32) -> f32 {
    c * policy * sum_of_action_visits.sqrt() / (1.0 + action_visits)
}

/// U(s, a) + W(s, a) - L(s, a)
pub fn upper_confidence_bound(c: f32, node: &Node, action: usize) -> f32 {
    exploration(
        c,
        node.policy[action],
        node.visit_count() as f32,
        node.visits[action] as f32,
    ) + node.q_values[action]
        - node.virtual_loss[action]
}
