mod temperature;
