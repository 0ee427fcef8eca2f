pub mod branch;
pub mod items;
pub mod lists;
pub mod types;

pub use branch::{branch_list, get_branches};
pub use items::{add_item, get_item, get_items, remove_item, reorder_items, update_item};
pub use lists::{create_list, delete_list, get_list, list_lists, navigate, update_list};
pub use types::{
    Direction, InterestList, InterestListBranch, InterestListItem, ItemStatus, ItemType,
    ItemUpdate, ListFilter, ListStatus, ListType, ListUpdate, NewItem, NewList,
};
