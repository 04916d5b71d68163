pub mod perm;
