pub(super) mod booking;
pub(super) mod catalog;
pub(super) mod facility;
pub(super) mod order;
pub(super) mod payment;

use crate::adapter::datastore::AbsDStoreFilterKeyOp;

// accept every key of a table, for the list-all style fetches
pub(super) struct AcceptAllFilterOp;

impl AbsDStoreFilterKeyOp for AcceptAllFilterOp {
    fn filter(&self, _k: &String, _v: &Vec<String>) -> bool {
        true
    }
}
