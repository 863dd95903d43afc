mod helpers;
mod verifier;
