mod helpers;
mod pages;
