pub mod azure_blob;
#[cfg(test)]
pub mod in_memory;
