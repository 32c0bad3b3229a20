mod fakes;
mod inspect;
