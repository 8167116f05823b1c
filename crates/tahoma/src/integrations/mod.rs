pub mod overkiz;
