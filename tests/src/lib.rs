//! Cross-crate tests: the registry driven through real list files and canned
//! sources, and the HTTP layer on top of it.

#[cfg(test)]
mod fixtures;

#[cfg(test)]
mod registry {
    mod concurrency;
    mod integration;
}

#[cfg(test)]
mod server {
    mod integration;
}
