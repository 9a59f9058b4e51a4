//! Display ordering for todo lists.

use crate::domain::Todo;

/// Sort todos newest first by `created_at`.
///
/// The sort is stable: todos created in the same millisecond keep the order
/// they were retrieved in.
pub fn sort_newest_first(todos: &mut [Todo]) {
    todos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TimeMs, Title, TodoId};

    fn make_todo(id: i64, created_at: i64) -> Todo {
        Todo {
            id: TodoId::new(id),
            title: Title::new(format!("todo {}", id)).unwrap(),
            completed: false,
            created_at: TimeMs::new(created_at),
            updated_at: TimeMs::new(created_at),
        }
    }

    #[test]
    fn test_sort_newest_first() {
        let mut todos = vec![make_todo(1, 1000), make_todo(2, 3000), make_todo(3, 2000)];

        sort_newest_first(&mut todos);

        let ids: Vec<i64> = todos.iter().map(|t| t.id.as_i64()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_ties_keep_retrieval_order() {
        let mut todos = vec![make_todo(1, 1000), make_todo(2, 1000), make_todo(3, 500)];

        sort_newest_first(&mut todos);

        let ids: Vec<i64> = todos.iter().map(|t| t.id.as_i64()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_empty() {
        let mut todos: Vec<Todo> = Vec::new();
        sort_newest_first(&mut todos);
        assert!(todos.is_empty());
    }

    #[test]
    fn test_sort_ignores_updated_at() {
        let mut older = make_todo(1, 1000);
        older.updated_at = TimeMs::new(9000);
        let newer = make_todo(2, 2000);
        let mut todos = vec![older, newer];

        sort_newest_first(&mut todos);

        assert_eq!(todos[0].id, TodoId::new(2));
    }
}
