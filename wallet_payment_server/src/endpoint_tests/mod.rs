mod helpers;
mod payments;
mod wallet;
