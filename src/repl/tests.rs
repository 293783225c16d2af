use std::sync::Arc;

use super::*;
use crate::commands;
use crate::repl::completion::CompletionGate;
use crate::tree::CommandTree;

#[test]
fn test_shared_state_starts_logged_out() {
    let state = SharedState::new("cloud");
    assert_eq!(state.program_name(), "cloud");
    assert!(!state.is_logged_in());
    assert_eq!(state.user(), None);
}

#[test]
fn test_shared_state_clones_share_session() {
    let state = SharedState::new("cloud");
    let other = state.clone();
    state.login("dev@example.com");
    assert_eq!(other.user().as_deref(), Some("dev@example.com"));

    other.logout();
    assert!(!state.is_logged_in());
}

#[test]
fn test_shared_state_gates_completion() {
    let state = SharedState::new("cloud");
    let tree = CommandTree::from_clap(&commands::command());
    let node = tree.find(&["kafka", "cluster"]).unwrap();

    assert!(!state.can_complete(&node));
    state.login("dev@example.com");
    assert!(state.can_complete(&node));
}

#[test]
fn test_color_toggle() {
    let state = SharedState::new("cloud");
    state.set_color_enabled(false);
    assert!(!state.color_enabled());
    state.set_color_enabled(true);
    assert!(state.color_enabled());
}

#[test]
fn test_exit_prints_nothing() {
    let state = SharedState::new("cloud");
    let tree = Arc::new(CommandTree::from_clap(&commands::command()));
    let dispatcher = Dispatcher::new(state, tree);
    assert_eq!(dispatcher.execute(&ReplCommand::parse("exit")), "");
}
