/// Replaces the element whose key matches `item`'s, or appends `item`.
///
/// Returns `true` when an existing element was replaced.
pub fn upsert_by_key<T, K, F>(items: &mut Vec<T>, item: T, key: F) -> bool
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let wanted = key(&item);
    match items.iter().position(|x| key(x) == wanted) {
        Some(idx) => {
            items[idx] = item;
            true
        }
        None => {
            items.push(item);
            false
        }
    }
}

/// Drops every element whose key equals `wanted`, returning how many went.
pub fn remove_by_key<T, K, F>(items: &mut Vec<T>, wanted: &K, key: F) -> usize
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let before = items.len();
    items.retain(|x| key(x) != *wanted);
    before - items.len()
}
