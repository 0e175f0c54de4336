use crate::core::form::{Form, QuestionId, ResultId, Rule};
use petgraph::dot::Dot;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::fmt;

const LABEL_LIMIT: usize = 60;

/// Node weight: a question or a result.
enum FormNode {
    Question { id: QuestionId, text: String },
    Result { id: ResultId, text: String },
}

impl fmt::Display for FormNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormNode::Question { id, text } => write!(f, "Q{}\n{}", id, truncate(text)),
            FormNode::Result { id, text } => write!(f, "R{}\n{}", id, truncate(text)),
        }
    }
}

/// Edge weight carrying a rule label.
struct RuleEdge {
    label: String,
}

impl fmt::Display for RuleEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

fn build_graph(form: &Form) -> DiGraph<FormNode, RuleEdge> {
    let mut graph = DiGraph::new();
    let mut questions: HashMap<QuestionId, NodeIndex> = HashMap::new();
    let mut results: HashMap<ResultId, NodeIndex> = HashMap::new();

    for question in form.questions() {
        let idx = graph.add_node(FormNode::Question {
            id: question.id,
            text: question.text.clone(),
        });
        questions.insert(question.id, idx);
    }
    for result in form.results() {
        let idx = graph.add_node(FormNode::Result {
            id: result.id,
            text: result.text.clone(),
        });
        results.insert(result.id, idx);
    }

    for question in form.questions() {
        let from = questions[&question.id];
        for rule in &question.rules {
            let label = rule_label(rule);
            if let Some(&to) = rule.goto_question_id.and_then(|id| questions.get(&id)) {
                graph.add_edge(from, to, RuleEdge { label: label.clone() });
            }
            if let Some(&to) = rule.goto_result_id.and_then(|id| results.get(&id)) {
                graph.add_edge(from, to, RuleEdge { label });
            }
        }
    }

    graph
}

/// Render the form as a Graphviz DOT digraph. Rules whose targets are not in
/// the form produce no edge.
pub fn form_to_dot(form: &Form) -> String {
    let graph = build_graph(form);
    format!("{}", Dot::new(&graph))
}

fn rule_label(rule: &Rule) -> String {
    let base = rule.condition.as_deref().unwrap_or("default");
    match &rule.action {
        Some(action) => format!("{} / {}", truncate(base), action.kind()),
        None => truncate(base),
    }
}

fn truncate(value: &str) -> String {
    match value.char_indices().nth(LABEL_LIMIT) {
        Some((cut, _)) => format!("{}...", &value[..cut]),
        None => value.to_string(),
    }
}
