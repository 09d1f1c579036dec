mod naver;

pub use naver::NaverNewsProvider;
