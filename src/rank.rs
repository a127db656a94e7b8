//! Menu ordering by rank.

use crate::route::MergedRoute;

/// Rank assumed for routes that declare none. Sorts after every real rank.
pub const UNRANKED: i32 = i32::MAX;

/// Effective rank of a route.
pub fn rank_of(route: &MergedRoute) -> i32 {
    route.meta.rank.unwrap_or(UNRANKED)
}

/// Sort top-level routes by ascending rank.
///
/// Children keep the order the server sent them in. The sort is stable:
/// routes of equal rank, and unranked routes, keep their relative order.
///
/// ```
/// use admin_navigator::{rank::sort_by_rank, CatalogRoute, MergedRoute, RouteMeta};
///
/// let route = |name: &str, rank: Option<i32>| {
///     let meta = rank.map_or_else(RouteMeta::default, |r| RouteMeta::default().rank(r));
///     MergedRoute::from(&CatalogRoute::new(format!("/{name}"), name).meta(meta))
/// };
/// let sorted = sort_by_rank(vec![
///     route("a", Some(3)),
///     route("b", None),
///     route("c", Some(1)),
///     route("d", None),
/// ]);
/// let names: Vec<_> = sorted.iter().map(|r| r.name.as_str()).collect();
/// assert_eq!(names, ["c", "a", "b", "d"]);
/// ```
pub fn sort_by_rank(mut routes: Vec<MergedRoute>) -> Vec<MergedRoute> {
    routes.sort_by_key(rank_of);
    routes
}
