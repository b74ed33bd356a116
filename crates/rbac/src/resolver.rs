//! Role graph resolution.
//!
//! Computes a role's full transitive permission set over the inheritance
//! graph. The traversal carries a visited set of role names already entered
//! on the current resolution; a revisit contributes nothing, so resolution
//! terminates even on cyclic configurations.

use std::collections::{HashMap, HashSet};

use warden_core::{Permission, Role};

use crate::registry::{RoleDef, RoleRegistry};

/// Resolve the full permission set for `role_name`, following inheritance.
///
/// Depth-first over the inheritance graph, one visited set per call:
/// - a role name already entered resolves to the empty set (cycle guard;
///   self-inheritance is the same case);
/// - an undeclared role resolves to the empty set, not an error;
/// - otherwise the role's own grants are unioned with each inherited role's
///   resolution, in declaration order.
///
/// Diamond-shaped inheritance resolves a shared ancestor exactly once; set
/// union keeps the result free of double-counting. O(V + E) per call.
pub fn resolve(role_name: &str, registry: &RoleRegistry) -> HashSet<Permission> {
    let mut visited = HashSet::new();
    resolve_into(role_name, registry, &mut visited)
}

fn resolve_into(
    role_name: &str,
    registry: &RoleRegistry,
    visited: &mut HashSet<Role>,
) -> HashSet<Permission> {
    if !visited.insert(Role::from(role_name)) {
        return HashSet::new();
    }

    let Some(role) = registry.role(role_name) else {
        return HashSet::new();
    };

    let mut resolved: HashSet<Permission> = role.permissions().iter().cloned().collect();
    for parent in role.inherits() {
        resolved.extend(resolve_into(parent.as_str(), registry, visited));
    }

    resolved
}

/// Role names participating in an inheritance cycle, in declaration order.
///
/// Resolution silently truncates cyclic contributions; this exists so the
/// cache build can warn operators about grants that get dropped.
pub fn cyclic_roles(registry: &RoleRegistry) -> Vec<Role> {
    let mut marks: HashMap<Role, Mark> = HashMap::new();
    let mut stack: Vec<Role> = Vec::new();
    let mut cyclic: HashSet<Role> = HashSet::new();

    for role in registry.roles() {
        visit(role.name().as_str(), registry, &mut marks, &mut stack, &mut cyclic);
    }

    let mut reported: HashSet<Role> = HashSet::new();
    registry
        .roles()
        .iter()
        .map(RoleDef::name)
        .filter(|name| cyclic.contains(name.as_str()) && reported.insert((*name).clone()))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

fn visit(
    name: &str,
    registry: &RoleRegistry,
    marks: &mut HashMap<Role, Mark>,
    stack: &mut Vec<Role>,
    cyclic: &mut HashSet<Role>,
) {
    if let Some(mark) = marks.get(name) {
        if *mark == Mark::InProgress {
            // Back edge: every role from `name` up the stack is on the cycle.
            if let Some(pos) = stack.iter().position(|r| r.as_str() == name) {
                for role in &stack[pos..] {
                    cyclic.insert(role.clone());
                }
            }
        }
        return;
    }

    let Some(role) = registry.role(name) else {
        // Dangling inheritance edge; nothing to walk.
        return;
    };

    marks.insert(role.name().clone(), Mark::InProgress);
    stack.push(role.name().clone());

    for parent in role.inherits() {
        visit(parent.as_str(), registry, marks, stack, cyclic);
    }

    stack.pop();
    marks.insert(role.name().clone(), Mark::Done);
}
