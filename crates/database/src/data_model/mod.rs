//! Row types as they come out of the store, converted into the shared model
//! types at the query boundary.

pub mod agency;
pub mod block;
pub mod calendar;
pub mod metadata;
pub mod route;
pub mod shape;
pub mod stop;
pub mod stop_time;
pub mod trip;

pub(crate) fn into_models<R, M>(rows: Vec<R>) -> Vec<M>
where
    M: From<R>,
{
    rows.into_iter().map(M::from).collect()
}
